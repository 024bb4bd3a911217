//! ConcernStore - durable concern content and vote counters.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::clock::Clock;
use crate::config::BoardConfig;
use crate::domain::{Concern, ConcernId, NewConcern, VoteDelta};
use crate::geo_index::GeographicIndex;
use crate::model::{RecordStore, Versioned, WriteBatch};
use crate::CoreError;

pub struct ConcernStore<S> {
    store: S,
    index: GeographicIndex<S>,
    clock: Arc<dyn Clock>,
    config: BoardConfig,
}

impl<S: RecordStore + Clone> ConcernStore<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, config: BoardConfig) -> Self {
        let index = GeographicIndex::new(store.clone(), clock.clone());
        Self {
            store,
            index,
            clock,
            config,
        }
    }

    pub fn index(&self) -> &GeographicIndex<S> {
        &self.index
    }

    /// Validate and store a new concern, filing it under its location bucket
    /// in the same atomic write.
    pub fn create(&self, new: NewConcern) -> Result<ConcernId, CoreError> {
        let now = self.clock.now();
        let concern = self.build(new, now)?;
        let id = concern.id;

        let mut batch = WriteBatch::new();
        batch.insert(&concern)?;
        self.index.stage_register(
            &mut batch,
            concern.geographic_level,
            &concern.location_identifier,
            id,
            now,
        )?;
        self.store.apply_batch(batch)?;

        info!(
            concern_id = %id,
            level = %concern.geographic_level,
            location = %concern.location_identifier,
            anonymous = concern.author_id.is_none(),
            "concern created"
        );
        Ok(id)
    }

    pub fn get(&self, concern_id: ConcernId) -> Result<Concern, CoreError> {
        Ok(self.get_versioned(concern_id)?.data)
    }

    pub(crate) fn get_versioned(
        &self,
        concern_id: ConcernId,
    ) -> Result<Versioned<Concern>, CoreError> {
        self.store
            .get_record::<Concern>(&concern_id.to_string())?
            .ok_or(CoreError::NotFound { concern_id })
    }

    /// Add `delta` to the counters of `current` as part of `batch` and return
    /// the concern as it will read once the batch applies.
    /// Only the voting coordinator calls this, inside the concern's lock and
    /// alongside the matching ledger write.
    pub(crate) fn apply_vote_delta(
        &self,
        batch: &mut WriteBatch,
        current: &Versioned<Concern>,
        delta: VoteDelta,
        at: DateTime<Utc>,
    ) -> Result<Concern, CoreError> {
        if delta.is_zero() {
            return Ok(current.data.clone());
        }
        let updated = current.data.with_delta(delta, at).ok_or_else(|| {
            CoreError::validation(
                "vote_delta",
                format!(
                    "({:+}, {:+}) would make a counter of concern {} negative",
                    delta.upvotes, delta.downvotes, current.data.id
                ),
            )
        })?;
        batch.update(&updated, current.version)?;
        Ok(updated)
    }

    fn build(&self, new: NewConcern, now: DateTime<Utc>) -> Result<Concern, CoreError> {
        let text = required("text", &new.text, self.config.max_text_len)?;
        let location_identifier = required(
            "location_identifier",
            &new.location_identifier,
            self.config.max_location_len,
        )?;

        let author_display_name = match new.author_display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                if name.chars().count() > self.config.max_author_name_len {
                    return Err(CoreError::validation(
                        "author_display_name",
                        format!("longer than {} characters", self.config.max_author_name_len),
                    ));
                }
                Some(name.to_string())
            }
            _ => None,
        };

        Ok(Concern {
            id: ConcernId::new(),
            author_id: new.author_id.filter(|id| !id.is_blank()),
            author_display_name,
            text,
            created_at: now,
            updated_at: now,
            geographic_level: new.geographic_level,
            location_identifier,
            upvotes: 0,
            downvotes: 0,
        })
    }
}

fn required(field: &'static str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(CoreError::validation(
            field,
            format!("longer than {} characters", max_len),
        ));
    }
    Ok(trimmed.to_string())
}
