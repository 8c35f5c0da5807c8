//! The directory-service seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::LookupOutcome;

/// A directory service that maps numeric UIDs to email addresses.
///
/// `preflight` is called exactly once per run, before any `lookup`. A failing
/// preflight aborts the run; a failing `lookup` never does and is reported as
/// [`LookupOutcome::Failed`].
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Verify the directory service is reachable and the bind is accepted.
    async fn preflight(&self) -> Result<()>;

    /// Look up the email of the entry whose numeric UID equals `uid`.
    async fn lookup(&self, uid: u32) -> LookupOutcome;
}

#[async_trait]
impl<T: DirectoryLookup + ?Sized> DirectoryLookup for &T {
    async fn preflight(&self) -> Result<()> {
        (**self).preflight().await
    }

    async fn lookup(&self, uid: u32) -> LookupOutcome {
        (**self).lookup(uid).await
    }
}
