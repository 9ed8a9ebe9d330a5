//! Remote inventory entities
//!
//! An [`Inventory`] is the snapshot of remote file metadata taken once per
//! sync pass. It is never refreshed mid-pass.

use std::collections::HashMap;

/// Metadata of one file under the remote target directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileRecord {
    /// Path relative to the remote target root, POSIX separators
    pub path: String,
    /// Modification time, epoch seconds, UTC-normalized
    pub mtime: i64,
    /// Creation time, epoch seconds, UTC-normalized; `0` when unavailable
    pub ctime: i64,
    /// Size in bytes
    pub size: u64,
}

impl RemoteFileRecord {
    pub fn new(path: impl Into<String>, mtime: i64, ctime: i64, size: u64) -> Self {
        Self {
            path: path.into(),
            mtime,
            ctime,
            size,
        }
    }

    /// Returns true when the listing carried a creation time
    pub fn has_ctime(&self) -> bool {
        self.ctime != 0
    }
}

/// Immutable snapshot of the remote file set, indexed by path
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: Vec<RemoteFileRecord>,
    index: HashMap<String, usize>,
}

impl Inventory {
    /// Build an inventory; on duplicate paths the first record wins
    pub fn new(records: Vec<RemoteFileRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            index.entry(record.path.clone()).or_insert(i);
        }
        Self { records, index }
    }

    /// Inventory with no records (first deploy, fresh run)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a record by its target-relative path
    pub fn get(&self, path: &str) -> Option<&RemoteFileRecord> {
        self.index.get(path).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemoteFileRecord> {
        self.records.iter()
    }
}
