//! In-memory directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dirowner_core::{DirOwnerError, DirectoryLookup, LookupOutcome, Result};

/// A fixed table of UID entries answering like a directory service.
///
/// Useful for dry runs and for exercising the pipeline without a server.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    entries: HashMap<u32, LookupOutcome>,
    unreachable: Option<String>,
    lookups: AtomicUsize,
}

impl StaticDirectory {
    /// Create an empty, reachable directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry whose mail attribute is `email`
    #[must_use]
    pub fn with_entry(mut self, uid: u32, email: impl Into<String>) -> Self {
        self.entries.insert(uid, LookupOutcome::Found(email.into()));
        self
    }

    /// Add an entry that has no mail attribute
    #[must_use]
    pub fn with_entry_without_email(mut self, uid: u32) -> Self {
        self.entries.insert(uid, LookupOutcome::EntryWithoutEmail);
        self
    }

    /// Make queries for `uid` fail with `reason`
    #[must_use]
    pub fn with_failure(mut self, uid: u32, reason: impl Into<String>) -> Self {
        self.entries.insert(uid, LookupOutcome::Failed(reason.into()));
        self
    }

    /// Make the preflight fail with `reason`
    #[must_use]
    pub fn unreachable(mut self, reason: impl Into<String>) -> Self {
        self.unreachable = Some(reason.into());
        self
    }

    /// Number of `lookup` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DirectoryLookup for StaticDirectory {
    async fn preflight(&self) -> Result<()> {
        match &self.unreachable {
            Some(reason) => Err(DirOwnerError::Connectivity {
                url: "memory://".to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn lookup(&self, uid: u32) -> LookupOutcome {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.entries
            .get(&uid)
            .cloned()
            .unwrap_or(LookupOutcome::NoEntry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_like_a_directory() {
        let dir = StaticDirectory::new()
            .with_entry(30001, "alice@example.com")
            .with_entry_without_email(30003)
            .with_failure(30004, "busy");

        assert!(dir.preflight().await.is_ok());
        assert_eq!(
            dir.lookup(30001).await,
            LookupOutcome::Found("alice@example.com".into())
        );
        assert_eq!(dir.lookup(30002).await, LookupOutcome::NoEntry);
        assert_eq!(dir.lookup(30003).await, LookupOutcome::EntryWithoutEmail);
        assert!(dir.lookup(30004).await.is_failure());
        assert_eq!(dir.lookup_count(), 4);
    }

    #[tokio::test]
    async fn unreachable_fails_preflight() {
        let dir = StaticDirectory::new().unreachable("connection refused");
        let err = dir.preflight().await.unwrap_err();
        assert!(err.is_connectivity_error());
    }
}
