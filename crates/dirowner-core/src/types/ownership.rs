use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DirOwnerError, Result};
use crate::types::{IdentityRecord, ResolutionEntry};

/// Owning UID of a single validated directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnershipRecord {
    /// Path exactly as supplied by the caller
    pub path: String,

    /// Raw owner UID from filesystem metadata
    pub uid: u32,
}

impl OwnershipRecord {
    /// Create a new ownership record
    #[must_use]
    pub fn new(path: impl Into<String>, uid: u32) -> Self {
        Self {
            path: path.into(),
            uid,
        }
    }

    /// Join this record with the identity resolved for its UID
    #[must_use]
    pub fn join(self, identity: IdentityRecord) -> ResolutionEntry {
        ResolutionEntry::new(self, identity)
    }
}

/// Flat path-to-UID mapping exchanged between the extraction and resolution
/// stages.
///
/// Serializes as `{ "<path>": <uid>, ... }` in insertion order. Inserting a
/// path that is already present replaces its UID in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UidMap {
    records: Vec<OwnershipRecord>,
    index: HashMap<String, usize>,
}

impl UidMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, overwriting the UID of a repeated path
    pub fn insert(&mut self, record: OwnershipRecord) {
        if let Some(&slot) = self.index.get(&record.path) {
            self.records[slot].uid = record.uid;
        } else {
            self.index.insert(record.path.clone(), self.records.len());
            self.records.push(record);
        }
    }

    /// UID recorded for `path`, if any
    #[must_use]
    pub fn get(&self, path: &str) -> Option<u32> {
        self.index.get(path).map(|&slot| self.records[slot].uid)
    }

    /// Number of distinct paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no path was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse a map from a reader (a file or standard input)
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| DirOwnerError::InvalidUidMap(e.to_string()))
    }
}

impl FromIterator<OwnershipRecord> for UidMap {
    fn from_iter<I: IntoIterator<Item = OwnershipRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        for record in iter {
            map.insert(record);
        }
        map
    }
}

impl IntoIterator for UidMap {
    type Item = OwnershipRecord;
    type IntoIter = std::vec::IntoIter<OwnershipRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl Serialize for UidMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.path, &record.uid)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UidMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct UidMapVisitor;

        impl<'de> Visitor<'de> for UidMapVisitor {
            type Value = UidMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping path strings to non-negative integer UIDs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<UidMap, A::Error> {
                let mut map = UidMap::new();
                while let Some((path, uid)) = access.next_entry::<String, u32>()? {
                    map.insert(OwnershipRecord::new(path, uid));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(UidMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_insertion_order() {
        let map: UidMap = [
            OwnershipRecord::new("/data/zed", 30003),
            OwnershipRecord::new("/data/alice", 30001),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"/data/zed":30003,"/data/alice":30001}"#
        );
    }

    #[test]
    fn repeated_path_overwrites_in_place() {
        let mut map = UidMap::new();
        map.insert(OwnershipRecord::new("/a", 1));
        map.insert(OwnershipRecord::new("/b", 2));
        map.insert(OwnershipRecord::new("/a", 3));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("/a"), Some(3));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"/a":3,"/b":2}"#);
    }

    #[test]
    fn parses_preserving_order_and_exact_keys() {
        let map = UidMap::from_reader(r#"{"/data/bob/":30002, "./alice":30001}"#.as_bytes()).unwrap();
        assert_eq!(map.get("/data/bob/"), Some(30002));
        let paths: Vec<_> = map.clone().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, ["/data/bob/", "./alice"]);
        assert_eq!(map.get("./alice"), Some(30001));
    }

    #[test]
    fn rejects_negative_or_non_integer_uids() {
        for bad in [r#"{"/a":-1}"#, r#"{"/a":"1000"}"#, r#"{"/a":1.5}"#, "[1,2]", "nope"] {
            let err = UidMap::from_reader(bad.as_bytes()).unwrap_err();
            assert!(matches!(err, DirOwnerError::InvalidUidMap(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn empty_object_is_an_empty_map() {
        let map = UidMap::from_reader("{}".as_bytes()).unwrap();
        assert!(map.is_empty());
    }
}
