//! WriteBatch - Stage several record writes for one atomic apply.
//!
//! ## Example
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.update(&concern, concern_version)?;
//! batch.insert(&vote)?;
//! store.apply_batch(batch)?;
//! ```

use super::{storage_key, Record, StoreError};

/// What the stored version must be for a staged write to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// The record must not exist yet.
    Absent,
    /// The record must exist at exactly this version.
    Version(u64),
}

/// A staged write (type-erased).
#[derive(Debug, Clone)]
pub(crate) struct StagedWrite {
    pub(crate) collection: &'static str,
    pub(crate) key: String,
    /// Storage key: "COLLECTION:key"
    pub(crate) storage_key: String,
    /// JSON-serialized bytes
    pub(crate) bytes: Vec<u8>,
    pub(crate) expectation: Expectation,
}

/// Builder for a set of writes applied all-or-nothing by
/// [`RecordStore::apply_batch`](super::RecordStore::apply_batch).
#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: Vec<StagedWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a record that must not exist yet.
    pub fn insert<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        self.stage(record, Expectation::Absent)
    }

    /// Stage a replacement of a record last read at `expected_version`.
    pub fn update<R: Record>(&mut self, record: &R, expected_version: u64) -> Result<(), StoreError> {
        self.stage(record, Expectation::Version(expected_version))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub(crate) fn into_writes(self) -> Vec<StagedWrite> {
        self.writes
    }

    fn stage<R: Record>(&mut self, record: &R, expectation: Expectation) -> Result<(), StoreError> {
        let key = record.key();
        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Serde(e.to_string()))?;
        self.writes.push(StagedWrite {
            collection: R::COLLECTION,
            storage_key: storage_key(R::COLLECTION, &key),
            key,
            bytes,
            expectation,
        });
        Ok(())
    }
}
