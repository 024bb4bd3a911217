//! GeographicIndex - (level, location) bucket -> concern ids.
//!
//! Each concern's membership is its own [`BucketEntry`] record, so filing a
//! concern never rewrites or contends on the rest of its bucket.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::domain::{ConcernId, GeographicLevel};
use crate::model::{RecordStore, StoreError, WriteBatch};
use crate::{CoreError, Record};

/// One concern filed under one exact (level, location) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "bucket_entries")]
pub struct BucketEntry {
    #[record(key)]
    pub entry_key: String,
    pub geographic_level: GeographicLevel,
    pub location_identifier: String,
    pub concern_id: ConcernId,
    pub registered_at: DateTime<Utc>,
}

impl BucketEntry {
    /// Key prefix shared by every entry of a bucket.
    ///
    /// The location is length-prefixed, so a location containing `/` can
    /// never make one bucket's prefix match another bucket's entries.
    pub fn bucket_prefix(level: GeographicLevel, location_identifier: &str) -> String {
        format!(
            "{}/{}:{}/",
            level.as_str(),
            location_identifier.len(),
            location_identifier
        )
    }

    pub fn key_for(
        level: GeographicLevel,
        location_identifier: &str,
        concern_id: ConcernId,
    ) -> String {
        format!("{}{}", Self::bucket_prefix(level, location_identifier), concern_id)
    }
}

#[derive(Clone)]
pub struct GeographicIndex<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: RecordStore + Clone> GeographicIndex<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// File `concern_id` under the bucket. Returns false if it was already
    /// there; registering twice is a no-op.
    pub fn register(
        &self,
        level: GeographicLevel,
        location_identifier: &str,
        concern_id: ConcernId,
    ) -> Result<bool, CoreError> {
        let mut batch = WriteBatch::new();
        let staged = self.stage_register(
            &mut batch,
            level,
            location_identifier,
            concern_id,
            self.clock.now(),
        )?;
        if !staged {
            return Ok(false);
        }

        match self.store.apply_batch(batch) {
            Ok(()) => Ok(true),
            // A concurrent registration of the same id got there first.
            Err(err) if err.is_conflict() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Ids in the bucket, oldest registration first. Unknown buckets are empty.
    pub fn list(
        &self,
        level: GeographicLevel,
        location_identifier: &str,
    ) -> Result<Vec<ConcernId>, CoreError> {
        let prefix = BucketEntry::bucket_prefix(level, location_identifier);
        let mut entries: Vec<BucketEntry> = self
            .store
            .find_by_key_prefix::<BucketEntry>(&prefix)?
            .into_iter()
            .map(|v| v.data)
            .collect();
        entries.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.concern_id.cmp(&b.concern_id))
        });

        debug!(%level, location = location_identifier, count = entries.len(), "listed bucket");
        Ok(entries.into_iter().map(|e| e.concern_id).collect())
    }

    /// Location identifiers that have at least one concern at `level`, sorted.
    pub fn locations(&self, level: GeographicLevel) -> Result<Vec<String>, CoreError> {
        let prefix = format!("{}/", level.as_str());
        let locations: BTreeSet<String> = self
            .store
            .find_by_key_prefix::<BucketEntry>(&prefix)?
            .into_iter()
            .map(|v| v.data.location_identifier)
            .collect();
        Ok(locations.into_iter().collect())
    }

    /// Stage the entry that files `concern_id`. Returns false when it is
    /// already filed and nothing was staged.
    pub(crate) fn stage_register(
        &self,
        batch: &mut WriteBatch,
        level: GeographicLevel,
        location_identifier: &str,
        concern_id: ConcernId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let key = BucketEntry::key_for(level, location_identifier, concern_id);
        if self.store.get_record::<BucketEntry>(&key)?.is_some() {
            return Ok(false);
        }

        batch.insert(&BucketEntry {
            entry_key: key,
            geographic_level: level,
            location_identifier: location_identifier.to_string(),
            concern_id,
            registered_at: at,
        })?;
        Ok(true)
    }
}
