//! LeaderboardAggregator - ranked snapshots of one location bucket.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Concern, GeographicLevel};
use crate::geo_index::GeographicIndex;
use crate::model::RecordStore;
use crate::CoreError;

/// Net votes descending, then older first, then concern id ascending.
/// Total over distinct concerns, so every query ranks the same way.
pub fn rank_order(a: &Concern, b: &Concern) -> Ordering {
    b.net_votes()
        .cmp(&a.net_votes())
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Which slice of a leaderboard to return. Pages are zero-based; a size of
/// 0 means the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub entries: Vec<Concern>,
    pub page: usize,
    pub size: usize,
    /// Concerns in the whole bucket.
    pub total: usize,
}

impl LeaderboardPage {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.size.max(1))
    }
}

pub struct LeaderboardAggregator<S> {
    store: S,
    index: GeographicIndex<S>,
    default_page_size: usize,
    max_page_size: usize,
}

impl<S: RecordStore + Clone> LeaderboardAggregator<S> {
    pub fn new(
        store: S,
        index: GeographicIndex<S>,
        default_page_size: usize,
        max_page_size: usize,
    ) -> Self {
        Self {
            store,
            index,
            default_page_size,
            max_page_size,
        }
    }

    /// Every concern in the bucket, ranked. Unknown buckets are empty.
    pub fn query(
        &self,
        level: GeographicLevel,
        location_identifier: &str,
    ) -> Result<Vec<Concern>, CoreError> {
        let ids = self.index.list(level, location_identifier)?;
        let mut concerns = Vec::with_capacity(ids.len());
        for id in ids {
            match self.store.get_record::<Concern>(&id.to_string())? {
                Some(concern) => concerns.push(concern.data),
                None => warn!(concern_id = %id, %level, "indexed concern missing from store"),
            }
        }
        concerns.sort_by(rank_order);
        debug!(%level, location = location_identifier, count = concerns.len(), "leaderboard queried");
        Ok(concerns)
    }

    pub fn query_page(
        &self,
        level: GeographicLevel,
        location_identifier: &str,
        request: PageRequest,
    ) -> Result<LeaderboardPage, CoreError> {
        let size = match request.size {
            0 => self.default_page_size,
            size => size.min(self.max_page_size),
        };
        let ranked = self.query(level, location_identifier)?;
        let total = ranked.len();
        let entries = ranked
            .into_iter()
            .skip(request.page.saturating_mul(size))
            .take(size)
            .collect();
        Ok(LeaderboardPage {
            entries,
            page: request.page,
            size,
            total,
        })
    }
}
