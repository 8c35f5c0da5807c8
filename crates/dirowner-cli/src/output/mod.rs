//! JSON output on stdout.

use std::io::Write;

use anyhow::{Context as _, Result};
use serde::Serialize;

/// Layout of the JSON document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Indented, one key per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

impl OutputStyle {
    /// Serialize `value` in this layout.
    pub fn render<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        let text = match self {
            Self::Pretty => serde_json::to_string_pretty(value),
            Self::Compact => serde_json::to_string(value),
        };
        text.context("failed to serialize output")
    }
}

impl std::fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Write `value` as the run's only stdout document.
///
/// The document is rendered in full before anything is written, so a
/// serialization failure leaves stdout empty.
pub fn write_json<T: Serialize + ?Sized>(value: &T, style: OutputStyle) -> Result<()> {
    let text = style.render(value)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").context("failed to write to stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}
