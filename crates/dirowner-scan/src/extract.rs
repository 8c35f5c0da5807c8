//! Ownership extraction.

use dirowner_core::OwnershipRecord;
use tracing::debug;

use crate::error::ScanResult;
use crate::reader::OwnerUidReader;

/// Turns validated directory paths into [`OwnershipRecord`]s.
///
/// Only the directory inode itself is inspected; contents are never walked.
pub struct Extractor<R = Box<dyn OwnerUidReader>> {
    reader: R,
}

impl<R: OwnerUidReader> Extractor<R> {
    /// Create an extractor around an owner reader
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the owner of an already-validated path.
    ///
    /// The path is kept exactly as given.
    pub fn read(&self, path: &str) -> ScanResult<OwnershipRecord> {
        let uid = self.reader.owner_uid(path)?;
        debug!(path, uid, reader = self.reader.name(), "read owner");
        Ok(OwnershipRecord::new(path, uid))
    }
}
