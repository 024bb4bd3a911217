//! RecordStore - Abstract versioned storage for records.

use super::{Record, StoreError, Versioned, WriteBatch};

/// Abstract versioned storage for records.
///
/// Single-record writes check versions the same way a [`WriteBatch`] does,
/// so callers can build compare-and-swap loops on either.
pub trait RecordStore: Send + Sync {
    /// Get a record by key. Returns None if not found.
    fn get_record<R: Record>(&self, key: &str) -> Result<Option<Versioned<R>>, StoreError>;

    /// Insert a new record. Fails with `Conflict` if it already exists.
    fn insert_record<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError>;

    /// Replace an existing record if its stored version equals `expected_version`.
    fn update_record<R: Record>(
        &self,
        record: &R,
        expected_version: u64,
    ) -> Result<Versioned<R>, StoreError>;

    /// Records of one collection whose key starts with `key_prefix`, in key
    /// order.
    fn find_by_key_prefix<R: Record>(
        &self,
        key_prefix: &str,
    ) -> Result<Vec<Versioned<R>>, StoreError>;

    /// Apply every staged write atomically. If any expectation fails, no
    /// write is applied and the first failing expectation is reported.
    fn apply_batch(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
