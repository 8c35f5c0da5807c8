use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::{IdentityRecord, LookupOutcome, OwnershipRecord};

/// One resolved path: its owner UID joined with the directory outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionEntry {
    /// Path exactly as supplied by the caller
    pub path: String,

    /// Raw owner UID
    pub uid: u32,

    /// Directory outcome for `uid`
    pub outcome: LookupOutcome,
}

impl ResolutionEntry {
    /// Join an ownership record with its identity record
    #[must_use]
    pub fn new(owner: OwnershipRecord, identity: IdentityRecord) -> Self {
        debug_assert_eq!(owner.uid, identity.uid);
        Self {
            path: owner.path,
            uid: owner.uid,
            outcome: identity.outcome,
        }
    }

    /// Email as written to the report (empty when unresolved)
    #[must_use]
    pub fn email(&self) -> &str {
        self.outcome.email().unwrap_or_default()
    }
}

#[derive(Serialize)]
struct ReportValue<'a> {
    uid: u32,
    email: &'a str,
}

/// Final path → `{ uid, email }` document.
///
/// Keys keep the order in which paths were inserted and are never
/// normalized. Serialization follows the output contract:
///
/// ```json
/// { "/data/alice": { "uid": 30001, "email": "alice@example.com" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ResolutionEntry>,
    index: HashMap<String, usize>,
}

impl Report {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; a repeated path replaces the earlier value in place
    pub fn insert(&mut self, entry: ResolutionEntry) {
        if let Some(&slot) = self.index.get(&entry.path) {
            self.entries[slot] = entry;
        } else {
            self.index.insert(entry.path.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    /// Entry for `path`, if present
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ResolutionEntry> {
        self.index.get(path).map(|&slot| &self.entries[slot])
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the report has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that resolved to an email
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.email().is_some())
            .count()
    }

}

impl FromIterator<ResolutionEntry> for Report {
    fn from_iter<I: IntoIterator<Item = ResolutionEntry>>(iter: I) -> Self {
        let mut report = Self::new();
        for entry in iter {
            report.insert(entry);
        }
        report
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let value = ReportValue {
                uid: entry.uid,
                email: entry.email(),
            };
            map.serialize_entry(&entry.path, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, uid: u32, outcome: LookupOutcome) -> ResolutionEntry {
        OwnershipRecord::new(path, uid).join(IdentityRecord::new(uid, outcome))
    }

    #[test]
    fn matches_output_contract() {
        let report: Report = [
            entry("/data/alice", 30001, LookupOutcome::Found("alice@example.com".into())),
            entry("/data/bob", 30002, LookupOutcome::NoEntry),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"/data/alice":{"uid":30001,"email":"alice@example.com"},"/data/bob":{"uid":30002,"email":""}}"#
        );
        assert_eq!(report.resolved_count(), 1);
    }

    #[test]
    fn every_non_found_outcome_serializes_as_empty_email() {
        let report: Report = [
            entry("/a", 1, LookupOutcome::NoEntry),
            entry("/b", 2, LookupOutcome::EntryWithoutEmail),
            entry("/c", 3, LookupOutcome::Failed("timeout".into())),
        ]
        .into_iter()
        .collect();

        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        for path in ["/a", "/b", "/c"] {
            assert_eq!(value[path]["email"], "");
        }
        assert_eq!(value["/c"]["uid"], 3);
    }

    #[test]
    fn keys_are_not_normalized() {
        let report: Report = [
            entry("/data/alice/", 1, LookupOutcome::NoEntry),
            entry("/data/./alice", 1, LookupOutcome::NoEntry),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.len(), 2);
        assert!(report.get("/data/alice/").is_some());
        assert!(report.get("/data/./alice").is_some());
        assert!(report.get("/data/alice").is_none());
    }

    #[test]
    fn repeated_path_keeps_first_position() {
        let mut report = Report::new();
        report.insert(entry("/a", 1, LookupOutcome::NoEntry));
        report.insert(entry("/b", 2, LookupOutcome::NoEntry));
        report.insert(entry("/a", 1, LookupOutcome::Found("a@example.com".into())));

        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"/a":{"uid":1,"email":"a@example.com"},"/b":{"uid":2,"email":""}}"#
        );
        assert_eq!(report.get("/a").unwrap().email(), "a@example.com");
    }

    #[test]
    fn empty_report_is_empty_object() {
        assert_eq!(serde_json::to_string(&Report::new()).unwrap(), "{}");
        assert_eq!(serde_json::to_string_pretty(&Report::new()).unwrap(), "{}");
    }
}
