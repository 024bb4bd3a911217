//! InMemoryRecordStore - ordered map of serialized records.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use super::batch::StagedWrite;
use super::{storage_key, Expectation, Record, RecordStore, StoreError, Versioned, WriteBatch};

/// Internal stored representation of a record.
struct StoredRecord {
    bytes: Vec<u8>,
    version: u64,
}

/// In-memory record store backed by a `BTreeMap`.
///
/// Storage key is `"COLLECTION:key"`; keys are kept ordered so key-prefix
/// scans only visit matching records. Clones share the same storage.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    storage: Arc<RwLock<BTreeMap<String, StoredRecord>>>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Create a new empty record store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Number of records stored in one collection.
    pub fn count<R: Record>(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Poisoned("count"))?;
        let prefix = storage_key(R::COLLECTION, "");
        let count = Self::scan(&storage, &prefix).count();
        Ok(count)
    }

    fn check(write: &StagedWrite, actual: Option<u64>) -> Result<u64, StoreError> {
        match (write.expectation, actual) {
            (Expectation::Absent, None) => Ok(1),
            (Expectation::Absent, Some(actual)) => Err(StoreError::Conflict {
                collection: write.collection.to_string(),
                key: write.key.clone(),
                expected: 0,
                actual,
            }),
            (Expectation::Version(_), None) => Err(StoreError::NotFound {
                collection: write.collection.to_string(),
                key: write.key.clone(),
            }),
            (Expectation::Version(expected), Some(actual)) if expected == actual => Ok(actual + 1),
            (Expectation::Version(expected), Some(actual)) => Err(StoreError::Conflict {
                collection: write.collection.to_string(),
                key: write.key.clone(),
                expected,
                actual,
            }),
        }
    }

    fn scan<'a>(
        storage: &'a BTreeMap<String, StoredRecord>,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a StoredRecord> + 'a {
        storage
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(_, stored)| stored)
    }

    fn decode<R: Record>(stored: &StoredRecord) -> Result<Versioned<R>, StoreError> {
        let data: R =
            serde_json::from_slice(&stored.bytes).map_err(|e| StoreError::Serde(e.to_string()))?;
        Ok(Versioned {
            data,
            version: stored.version,
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get_record<R: Record>(&self, key: &str) -> Result<Option<Versioned<R>>, StoreError> {
        let key = storage_key(R::COLLECTION, key);
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Poisoned("get"))?;

        storage.get(&key).map(Self::decode::<R>).transpose()
    }

    fn insert_record<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError> {
        let mut batch = WriteBatch::new();
        batch.insert(record)?;
        self.apply_batch(batch)?;
        Ok(Versioned {
            data: record.clone(),
            version: 1,
        })
    }

    fn update_record<R: Record>(
        &self,
        record: &R,
        expected_version: u64,
    ) -> Result<Versioned<R>, StoreError> {
        let mut batch = WriteBatch::new();
        batch.update(record, expected_version)?;
        self.apply_batch(batch)?;
        Ok(Versioned {
            data: record.clone(),
            version: expected_version + 1,
        })
    }

    fn find_by_key_prefix<R: Record>(
        &self,
        key_prefix: &str,
    ) -> Result<Vec<Versioned<R>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Poisoned("prefix scan"))?;

        let prefix = storage_key(R::COLLECTION, key_prefix);
        let records = Self::scan(&storage, &prefix)
            .map(Self::decode::<R>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn apply_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let writes = batch.into_writes();
        if writes.is_empty() {
            return Ok(());
        }

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Poisoned("apply batch"))?;

        // Validate everything first; a key staged twice sees its own earlier write.
        let versions = {
            let mut pending: HashMap<&str, u64> = HashMap::new();
            let mut versions = Vec::with_capacity(writes.len());
            for write in &writes {
                let actual = pending
                    .get(write.storage_key.as_str())
                    .copied()
                    .or_else(|| storage.get(&write.storage_key).map(|s| s.version));
                let next = Self::check(write, actual)?;
                pending.insert(write.storage_key.as_str(), next);
                versions.push(next);
            }
            versions
        };

        for (write, version) in writes.into_iter().zip(versions) {
            storage.insert(
                write.storage_key,
                StoredRecord {
                    bytes: write.bytes,
                    version,
                },
            );
        }

        Ok(())
    }
}
