//! Records - versioned, serialized storage shared by concerns, votes and
//! location buckets.
//!
//! Every record lives under `"COLLECTION:key"` and carries a version stamp
//! that starts at 1 and increases by one on each write. Writers that need
//! read-modify-write semantics stage their changes in a [`WriteBatch`] with the
//! version they read; the store applies the whole batch or nothing.
//!
//! ## Example
//!
//! ```ignore
//! use prajaavaani_core::{InMemoryRecordStore, Record, RecordStore, WriteBatch};
//!
//! #[derive(Serialize, Deserialize, Clone, Record)]
//! #[record(collection = "tallies")]
//! struct Tally {
//!     #[record(key)]
//!     pub id: String,
//!     pub count: u64,
//! }
//!
//! let store = InMemoryRecordStore::new();
//! store.insert_record(&tally)?;
//! let loaded = store.get_record::<Tally>("t-1")?;
//! ```

mod batch;
mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be stored in a [`RecordStore`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this record type (e.g. "concerns", "votes").
    /// Maps to a table in SQL, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the unique key of this record within its collection.
    fn key(&self) -> String;
}

/// A record together with the version it was read or written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Optimistic concurrency conflict. `expected` is 0 when the writer
    /// expected the record to be absent.
    #[error("version conflict on {collection}:{key} (expected version {expected}, actual {actual})")]
    Conflict {
        collection: String,
        key: String,
        expected: u64,
        actual: u64,
    },
    /// Serialization/deserialization error.
    #[error("record serialization error: {0}")]
    Serde(String),
    /// The record to update does not exist.
    #[error("record not found: {collection}:{key}")]
    NotFound { collection: String, key: String },
    /// The storage lock was poisoned by a panicking writer.
    #[error("record store lock poisoned during {0}")]
    Poisoned(&'static str),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

pub(crate) fn storage_key(collection: &str, key: &str) -> String {
    format!("{}:{}", collection, key)
}

pub use batch::{Expectation, WriteBatch};
pub use in_memory::InMemoryRecordStore;
pub use store::RecordStore;
