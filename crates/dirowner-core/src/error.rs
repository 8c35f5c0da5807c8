use thiserror::Error;

/// Result type alias for dirowner operations
pub type Result<T> = std::result::Result<T, DirOwnerError>;

/// Errors that can occur while resolving directory ownership
#[derive(Error, Debug)]
pub enum DirOwnerError {
    /// Invocation was malformed (e.g. no paths supplied)
    #[error("usage error: {0}")]
    Usage(String),

    /// The directory service could not be reached during preflight
    #[error("directory service unreachable at {url}: {reason}")]
    Connectivity {
        /// Endpoint that was contacted
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// Authenticated bind was rejected
    #[error("bind as {bind_dn} failed: {reason}")]
    Bind {
        /// Principal used for the bind
        bind_dn: String,
        /// Underlying failure
        reason: String,
    },

    /// A directory search failed
    #[error("directory search failed: {0}")]
    Search(String),

    /// Path does not exist or cannot be reached
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// Path exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Owner metadata could not be read
    #[error("cannot read owner of {path}: {reason}")]
    Metadata {
        /// Path that was inspected
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// Intermediate UID map is malformed
    #[error("invalid UID map: {0}")]
    InvalidUidMap(String),

    /// The execution context does not observe true host UIDs
    #[error(
        "UID visibility probe {probe} is owned by {observed}, expected {expected}; \
         run the extraction stage on the host instead"
    )]
    UidVisibility {
        /// Probe file that was inspected
        probe: String,
        /// UID observed from this context
        observed: u32,
        /// UID the operator expected
        expected: u32,
    },

    /// The UID visibility probe file could not be read
    #[error("cannot read owner of UID visibility probe {probe}: {reason}")]
    ProbeUnreadable {
        /// Probe file that was inspected
        probe: String,
        /// Underlying failure
        reason: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DirOwnerError {
    /// Returns true if the error aborts the whole run.
    ///
    /// Path-level and search-level problems are recoverable: the path is
    /// skipped or the UID reports an empty email.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::PathNotFound(_)
                | Self::NotADirectory(_)
                | Self::Metadata { .. }
                | Self::Search(_)
        )
    }

    /// Returns true if the error is a directory-service connectivity failure
    #[must_use]
    pub const fn is_connectivity_error(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::Bind { .. })
    }

    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ if self.is_connectivity_error() => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_errors_are_recoverable() {
        assert!(!DirOwnerError::PathNotFound("/nope".into()).is_fatal());
        assert!(!DirOwnerError::NotADirectory("/etc/hosts".into()).is_fatal());
        assert!(!DirOwnerError::Search("timeout".into()).is_fatal());
    }

    #[test]
    fn preflight_errors_are_fatal() {
        let err = DirOwnerError::Connectivity {
            url: "ldap://localhost:389".into(),
            reason: "connection refused".into(),
        };
        assert!(err.is_fatal());
        assert!(err.is_connectivity_error());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unreadable_visibility_file_is_fatal() {
        let err = DirOwnerError::ProbeUnreadable {
            probe: "/etc/owner-probe".into(),
            reason: "permission denied".into(),
        };
        assert!(err.is_fatal());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn usage_exit_code() {
        assert_eq!(DirOwnerError::Usage("no paths".into()).exit_code(), 2);
        assert_eq!(DirOwnerError::Config("bad".into()).exit_code(), 1);
    }
}
