use thiserror::Error;

/// Result type alias for scan operations
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Errors from path validation and owner extraction
#[derive(Error, Debug)]
pub enum ScanError {
    /// No paths were supplied
    #[error("at least one path is required")]
    NoPaths,

    /// Path does not exist
    #[error("path does not exist: {0}")]
    NotFound(String),

    /// Path exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Path metadata could not be read
    #[error("cannot read metadata of {path}: {source}")]
    Metadata {
        /// Path that was inspected
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The `stat` utility failed under every known convention
    #[error("stat failed for {path}: {reason}")]
    StatCommand {
        /// Path that was inspected
        path: String,
        /// Last failure observed
        reason: String,
    },
}

impl From<ScanError> for dirowner_core::DirOwnerError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NoPaths => Self::Usage(err.to_string()),
            ScanError::NotFound(path) => Self::PathNotFound(path),
            ScanError::NotADirectory(path) => Self::NotADirectory(path),
            ScanError::Metadata { path, source } => Self::Metadata {
                path,
                reason: source.to_string(),
            },
            ScanError::StatCommand { path, reason } => Self::Metadata { path, reason },
        }
    }
}
