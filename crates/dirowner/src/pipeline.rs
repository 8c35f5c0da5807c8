//! The resolution pipeline.

use std::collections::HashMap;

use dirowner_core::{
    DirOwnerError, DirectoryLookup, IdentityRecord, LookupOutcome, OwnershipRecord, Report,
    ResolutionEntry, Result, UidMap,
};
use dirowner_scan::{validate_paths, Extractor, OwnerUidReader};
use tracing::{debug, info, warn};

/// Resolves UIDs against a directory that passed its preflight.
///
/// Outcomes are memoized for the lifetime of the resolver, so a UID owning
/// several paths is queried once per run. Nothing outlives the resolver.
pub struct Resolver<D> {
    directory: D,
    cache: HashMap<u32, LookupOutcome>,
}

impl<D: DirectoryLookup> Resolver<D> {
    /// Run the connectivity preflight and wrap the directory.
    ///
    /// # Errors
    ///
    /// Whatever the preflight returns; the run must abort on it.
    pub async fn connect(directory: D) -> Result<Self> {
        directory.preflight().await?;
        debug!("directory preflight passed");
        Ok(Self {
            directory,
            cache: HashMap::new(),
        })
    }

    /// Unwrap the directory
    pub fn into_inner(self) -> D {
        self.directory
    }

    /// Look up the identity for `uid`
    pub async fn identify(&mut self, uid: u32) -> IdentityRecord {
        if let Some(outcome) = self.cache.get(&uid) {
            return IdentityRecord::new(uid, outcome.clone());
        }

        let outcome = self.directory.lookup(uid).await;
        self.cache.insert(uid, outcome.clone());
        IdentityRecord::new(uid, outcome)
    }

    /// Resolve one ownership record into a report entry
    pub async fn resolve(&mut self, record: OwnershipRecord) -> ResolutionEntry {
        let identity = self.identify(record.uid).await;
        match identity.email() {
            Some(email) => info!(path = %record.path, uid = record.uid, email, "resolved"),
            None if identity.outcome.is_failure() => {
                warn!(path = %record.path, uid = record.uid, outcome = %identity.outcome, "unresolved");
            }
            None => info!(path = %record.path, uid = record.uid, outcome = %identity.outcome, "unresolved"),
        }
        record.join(identity)
    }
}

/// Read the owner of a validated path.
///
/// Path-level failures skip the path with a diagnostic; a fatal error ends
/// the run.
fn read_owner<R: OwnerUidReader>(
    extractor: &Extractor<R>,
    path: &str,
) -> Result<Option<OwnershipRecord>> {
    match extractor.read(path) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            let err = DirOwnerError::from(e);
            if err.is_fatal() {
                return Err(err);
            }
            warn!(path, error = %err, "skipping path, owner unreadable");
            Ok(None)
        }
    }
}

/// Host-side stage: extract the owner UID of every valid directory.
///
/// Never contacts a directory service.
///
/// # Errors
///
/// [`DirOwnerError::Usage`] if `paths` is empty. Bad paths are skipped.
pub fn extract_stage<R, I, S>(extractor: &Extractor<R>, paths: I) -> Result<UidMap>
where
    R: OwnerUidReader,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let validation = validate_paths(paths)?;

    let mut map = UidMap::new();
    for path in &validation.accepted {
        if let Some(record) = read_owner(extractor, path)? {
            map.insert(record);
        }
    }

    info!(
        extracted = map.len(),
        invalid = validation.skipped.len(),
        "extraction complete"
    );
    Ok(map)
}

/// Resolution-only stage: turn an intermediate UID map into a report
pub async fn resolve_stage<D: DirectoryLookup>(resolver: &mut Resolver<D>, map: UidMap) -> Report {
    let mut report = Report::new();
    for record in map {
        report.insert(resolver.resolve(record).await);
    }
    summarize(&report);
    report
}

/// Extraction and resolution in one context.
///
/// Paths are handled one at a time: each valid directory is extracted and
/// immediately resolved before moving to the next.
///
/// # Errors
///
/// [`DirOwnerError::Usage`] if `paths` is empty. Bad paths are skipped,
/// never fatal.
pub async fn single_stage<R, D, I, S>(
    extractor: &Extractor<R>,
    resolver: &mut Resolver<D>,
    paths: I,
) -> Result<Report>
where
    R: OwnerUidReader,
    D: DirectoryLookup,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let validation = validate_paths(paths)?;

    let mut report = Report::new();
    for path in &validation.accepted {
        if let Some(record) = read_owner(extractor, path)? {
            report.insert(resolver.resolve(record).await);
        }
    }

    summarize(&report);
    Ok(report)
}

fn summarize(report: &Report) {
    info!(
        entries = report.len(),
        resolved = report.resolved_count(),
        "report complete"
    );
}
