//! Owner UID readers.
//!
//! Two conventions exist for reading an owner UID from outside the process:
//! GNU `stat -c %u` and BSD `stat -f %u`. [`StatCommandReader`] tries both
//! and remembers whichever works. [`MetadataReader`] asks the kernel
//! directly and is preferred when available; [`FallbackReader`] chains the
//! two so callers never see which one answered.

use std::fmt;
use std::process::Command;
use std::str::FromStr;
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::error::{ScanError, ScanResult};

/// Reads the owning UID of a filesystem path
pub trait OwnerUidReader: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Owner UID of the path itself (not its contents)
    fn owner_uid(&self, path: &str) -> ScanResult<u32>;
}

impl<T: OwnerUidReader + ?Sized> OwnerUidReader for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn owner_uid(&self, path: &str) -> ScanResult<u32> {
        (**self).owner_uid(path)
    }
}

/// Reads `st_uid` through `lstat(2)`
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataReader;

impl OwnerUidReader for MetadataReader {
    fn name(&self) -> &'static str {
        "metadata"
    }

    #[cfg(unix)]
    fn owner_uid(&self, path: &str) -> ScanResult<u32> {
        use std::os::unix::fs::MetadataExt;

        std::fs::symlink_metadata(path)
            .map(|meta| meta.uid())
            .map_err(|source| ScanError::Metadata {
                path: path.to_string(),
                source,
            })
    }

    #[cfg(not(unix))]
    fn owner_uid(&self, path: &str) -> ScanResult<u32> {
        Err(ScanError::Metadata {
            path: path.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "numeric owner UIDs are only available on unix",
            ),
        })
    }
}

/// Command-line syntax of the host `stat` utility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatConvention {
    /// GNU coreutils: `stat -c %u`
    Gnu,
    /// BSD/macOS: `stat -f %u`
    Bsd,
}

impl StatConvention {
    const ALL: [Self; 2] = [Self::Gnu, Self::Bsd];

    const fn format_flag(self) -> &'static str {
        match self {
            Self::Gnu => "-c",
            Self::Bsd => "-f",
        }
    }
}

/// Reads the owner UID by running the `stat` utility
#[derive(Debug)]
pub struct StatCommandReader {
    program: String,
    convention: OnceLock<StatConvention>,
}

impl Default for StatCommandReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCommandReader {
    /// Use `stat` from `PATH`, detecting the convention on first use
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("stat")
    }

    /// Use a specific `stat` binary
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            convention: OnceLock::new(),
        }
    }

    /// Convention in use, once one has succeeded
    #[must_use]
    pub fn convention(&self) -> Option<StatConvention> {
        self.convention.get().copied()
    }

    fn run(&self, convention: StatConvention, path: &str) -> Result<u32, String> {
        let output = Command::new(&self.program)
            .args([convention.format_flag(), "%u", "--", path])
            .output()
            .map_err(|e| format!("cannot run {}: {e}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{convention:?} stat exited with {}: {}", output.status, stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse()
            .map_err(|_| format!("{convention:?} stat printed {:?}", stdout.trim()))
    }
}

impl OwnerUidReader for StatCommandReader {
    fn name(&self) -> &'static str {
        "stat"
    }

    fn owner_uid(&self, path: &str) -> ScanResult<u32> {
        if let Some(convention) = self.convention() {
            return self.run(convention, path).map_err(|reason| ScanError::StatCommand {
                path: path.to_string(),
                reason,
            });
        }

        let mut last_failure = String::new();
        for convention in StatConvention::ALL {
            match self.run(convention, path) {
                Ok(uid) => {
                    debug!(?convention, "detected stat convention");
                    let _ = self.convention.set(convention);
                    return Ok(uid);
                }
                Err(reason) => {
                    trace!(?convention, path, %reason, "stat convention failed");
                    last_failure = reason;
                }
            }
        }

        Err(ScanError::StatCommand {
            path: path.to_string(),
            reason: last_failure,
        })
    }
}

/// Tries `primary`, then `secondary`
#[derive(Debug, Default)]
pub struct FallbackReader<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackReader<P, S> {
    /// Chain two readers
    pub const fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: OwnerUidReader, S: OwnerUidReader> OwnerUidReader for FallbackReader<P, S> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn owner_uid(&self, path: &str) -> ScanResult<u32> {
        match self.primary.owner_uid(path) {
            Ok(uid) => Ok(uid),
            Err(primary_err) => {
                debug!(
                    path,
                    reader = self.primary.name(),
                    error = %primary_err,
                    fallback = self.secondary.name(),
                    "owner read failed, falling back"
                );
                self.secondary.owner_uid(path)
            }
        }
    }
}

/// Which reader to use, chosen once at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReaderKind {
    /// Metadata first, `stat` utility as fallback
    #[default]
    Auto,
    /// Metadata only
    Metadata,
    /// `stat` utility only
    Stat,
}

impl ReaderKind {
    /// Build the selected reader
    #[must_use]
    pub fn build(self) -> Box<dyn OwnerUidReader> {
        match self {
            Self::Auto => Box::new(FallbackReader::new(MetadataReader, StatCommandReader::new())),
            Self::Metadata => Box::new(MetadataReader),
            Self::Stat => Box::new(StatCommandReader::new()),
        }
    }
}

impl FromStr for ReaderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "metadata" | "meta" => Ok(Self::Metadata),
            "stat" => Ok(Self::Stat),
            _ => Err(format!("unknown reader: {s} (expected auto, metadata or stat)")),
        }
    }
}

impl fmt::Display for ReaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Metadata => write!(f, "metadata"),
            Self::Stat => write!(f, "stat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl OwnerUidReader for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn owner_uid(&self, path: &str) -> ScanResult<u32> {
            Err(ScanError::NotFound(path.to_string()))
        }
    }

    struct Fixed(u32);

    impl OwnerUidReader for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn owner_uid(&self, _path: &str) -> ScanResult<u32> {
            Ok(self.0)
        }
    }

    #[cfg(unix)]
    fn expected_uid(path: &std::path::Path) -> u32 {
        use std::os::unix::fs::MetadataExt;
        std::fs::symlink_metadata(path).unwrap().uid()
    }

    #[cfg(unix)]
    #[test]
    fn metadata_reader_reads_directory_owner() {
        let dir = tempfile::tempdir().unwrap();
        let uid = MetadataReader.owner_uid(&dir.path().display().to_string()).unwrap();
        assert_eq!(uid, expected_uid(dir.path()));
    }

    #[test]
    fn metadata_reader_reports_missing_path() {
        let err = MetadataReader.owner_uid("/definitely/not/here").unwrap_err();
        assert!(matches!(err, ScanError::Metadata { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn stat_reader_detects_gnu_convention() {
        let dir = tempfile::tempdir().unwrap();
        let reader = StatCommandReader::new();

        let uid = reader.owner_uid(&dir.path().display().to_string()).unwrap();
        assert_eq!(uid, expected_uid(dir.path()));
        assert_eq!(reader.convention(), Some(StatConvention::Gnu));
    }

    #[test]
    fn stat_reader_reports_missing_program() {
        let reader = StatCommandReader::with_program("/nonexistent/bin/stat");
        let err = reader.owner_uid("/tmp").unwrap_err();
        assert!(matches!(err, ScanError::StatCommand { .. }));
        assert_eq!(reader.convention(), None);
    }

    #[test]
    fn fallback_uses_secondary_when_primary_fails() {
        let reader = FallbackReader::new(Failing, Fixed(30001));
        assert_eq!(reader.owner_uid("/data/alice").unwrap(), 30001);

        let reader = FallbackReader::new(Fixed(1), Fixed(2));
        assert_eq!(reader.owner_uid("/data/alice").unwrap(), 1);
    }

    #[test]
    fn fallback_surfaces_secondary_error() {
        let reader = FallbackReader::new(Failing, Failing);
        assert!(reader.owner_uid("/data/alice").is_err());
    }

    #[test]
    fn reader_kind_parsing() {
        assert_eq!("auto".parse::<ReaderKind>().unwrap(), ReaderKind::Auto);
        assert_eq!("STAT".parse::<ReaderKind>().unwrap(), ReaderKind::Stat);
        assert_eq!("meta".parse::<ReaderKind>().unwrap(), ReaderKind::Metadata);
        assert!("ls".parse::<ReaderKind>().is_err());
        assert_eq!(ReaderKind::Metadata.build().name(), "metadata");
    }
}
