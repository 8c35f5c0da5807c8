//! Execution topology.
//!
//! The topology is an operator decision made once per run. Where true host
//! UIDs are visible (a privileged context or a hostPath-style mount) one
//! process does everything. Where a UID-namespace remap hides them, the host
//! runs [`Topology::ExtractOnly`] and pipes its map into a separate
//! [`Topology::ResolveOnly`] process.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;

use dirowner_core::{DirOwnerError, Result, UidMap};
use dirowner_scan::OwnerUidReader;
use tracing::debug;

/// Where the resolution-only stage reads its UID map from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidMapSource {
    /// Standard input (`-`)
    Stdin,
    /// A file written by the extraction stage
    File(PathBuf),
}

impl UidMapSource {
    /// Read and parse the map.
    ///
    /// # Errors
    ///
    /// [`DirOwnerError::Config`] if the file cannot be opened and
    /// [`DirOwnerError::InvalidUidMap`] if the input is not a path-to-UID
    /// object.
    pub fn load(&self) -> Result<UidMap> {
        let map = match self {
            Self::Stdin => UidMap::from_reader(std::io::stdin().lock())?,
            Self::File(path) => {
                let file = File::open(path).map_err(|e| {
                    DirOwnerError::Config(format!("cannot open UID map {}: {e}", path.display()))
                })?;
                UidMap::from_reader(BufReader::new(file))?
            }
        };
        debug!(source = %self, entries = map.len(), "loaded UID map");
        Ok(map)
    }
}

impl FromStr for UidMapSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(s))
        })
    }
}

impl fmt::Display for UidMapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Shape of a run, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Extract and resolve in this process
    SingleStage,
    /// Host half: extract and emit the UID map, no directory access
    ExtractOnly,
    /// Resolution half: read a UID map and resolve it
    ResolveOnly(UidMapSource),
}

impl Topology {
    /// Pick the topology from operator choices.
    ///
    /// # Errors
    ///
    /// [`DirOwnerError::Usage`] if both halves are requested at once.
    pub fn select(extract_only: bool, uid_map: Option<UidMapSource>) -> Result<Self> {
        match (extract_only, uid_map) {
            (true, Some(_)) => Err(DirOwnerError::Usage(
                "--extract-only and --uid-map select different stages".into(),
            )),
            (true, None) => Ok(Self::ExtractOnly),
            (false, Some(source)) => Ok(Self::ResolveOnly(source)),
            (false, None) => Ok(Self::SingleStage),
        }
    }

    /// Whether this run reads paths from the command line
    #[must_use]
    pub const fn needs_paths(&self) -> bool {
        !matches!(self, Self::ResolveOnly(_))
    }

    /// Whether this run talks to the directory service
    #[must_use]
    pub const fn needs_directory(&self) -> bool {
        !matches!(self, Self::ExtractOnly)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleStage => write!(f, "single-stage"),
            Self::ExtractOnly => write!(f, "extract-only"),
            Self::ResolveOnly(source) => write!(f, "resolve-only ({source})"),
        }
    }
}

/// Check that this context observes true host UIDs.
///
/// `probe` is a file whose host owner is known to be `expected`. Under a
/// UID-namespace remap the observed owner differs, and a single-stage run
/// would report wrong UIDs.
///
/// # Errors
///
/// [`DirOwnerError::UidVisibility`] on mismatch,
/// [`DirOwnerError::ProbeUnreadable`] if the probe cannot be read. Both end
/// the run.
pub fn probe_visibility(reader: &dyn OwnerUidReader, probe: &str, expected: u32) -> Result<()> {
    let observed = reader
        .owner_uid(probe)
        .map_err(|e| DirOwnerError::ProbeUnreadable {
            probe: probe.to_string(),
            reason: e.to_string(),
        })?;
    debug!(probe, observed, expected, "UID visibility probe");

    if observed == expected {
        Ok(())
    } else {
        Err(DirOwnerError::UidVisibility {
            probe: probe.to_string(),
            observed,
            expected,
        })
    }
}
