//! Input path validation.

use std::io::ErrorKind;

use tracing::{debug, warn};

use crate::error::{ScanError, ScanResult};

/// A path that was dropped during validation
#[derive(Debug)]
pub struct SkippedPath {
    /// Path exactly as supplied
    pub path: String,
    /// Why it was dropped
    pub reason: ScanError,
}

/// Outcome of validating a batch of paths
#[derive(Debug, Default)]
pub struct Validation {
    /// Existing directories, in the order they were supplied
    pub accepted: Vec<String>,
    /// Everything else
    pub skipped: Vec<SkippedPath>,
}

/// Check that `path` names an existing, reachable directory.
///
/// Symlinks to directories are accepted, like `test -d`.
pub fn validate_path(path: &str) -> ScanResult<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(path.to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ScanError::NotFound(path.to_string())),
        Err(source) => Err(ScanError::Metadata {
            path: path.to_string(),
            source,
        }),
    }
}

/// Validate every path, keeping the directories and skipping the rest.
///
/// Duplicates are kept; each occurrence is validated independently.
///
/// # Errors
///
/// Returns [`ScanError::NoPaths`] if `paths` is empty. Individual bad paths
/// never fail the batch.
pub fn validate_paths<I, S>(paths: I) -> ScanResult<Validation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut validation = Validation::default();
    let mut seen_any = false;

    for path in paths {
        seen_any = true;
        let path = path.as_ref();
        match validate_path(path) {
            Ok(()) => {
                debug!(path, "accepted directory");
                validation.accepted.push(path.to_string());
            }
            Err(reason) => {
                warn!(path, reason = %reason, "skipping path");
                validation.skipped.push(SkippedPath {
                    path: path.to_string(),
                    reason,
                });
            }
        }
    }

    if seen_any {
        Ok(validation)
    } else {
        Err(ScanError::NoPaths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        let err = validate_paths(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ScanError::NoPaths));
    }

    #[test]
    fn keeps_directories_in_order_and_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let file = dir.path().join("file.txt");
        std::fs::create_dir(&first).unwrap();
        std::fs::create_dir(&second).unwrap();
        std::fs::write(&file, b"x").unwrap();
        let missing = dir.path().join("missing");

        let inputs = [
            second.display().to_string(),
            file.display().to_string(),
            missing.display().to_string(),
            first.display().to_string(),
        ];
        let validation = validate_paths(&inputs).unwrap();

        assert_eq!(validation.accepted, [inputs[0].clone(), inputs[3].clone()]);
        assert_eq!(validation.skipped.len(), 2);
        assert!(matches!(validation.skipped[0].reason, ScanError::NotADirectory(_)));
        assert!(matches!(validation.skipped[1].reason, ScanError::NotFound(_)));
    }

    #[test]
    fn duplicates_are_validated_independently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().display().to_string();

        let validation = validate_paths([&path, &path]).unwrap();
        assert_eq!(validation.accepted.len(), 2);
    }

    #[test]
    fn accepted_paths_are_not_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = format!("{}/./", dir.path().display());

        let validation = validate_paths([&path]).unwrap();
        assert_eq!(validation.accepted, [path]);
    }
}
