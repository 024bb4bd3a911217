//! ConcernBoard - the operations exposed to the transport layer.
//!
//! ## Example
//!
//! ```ignore
//! let board = ConcernBoard::new();
//! let id = board.submit_concern(None, None, "pothole on 5th", GeographicLevel::Pincode, "110001")?;
//! board.cast_vote(Some(&UserId::new("user-a")), id, VoteType::Upvote)?;
//! let ranked = board.list_leaderboard(GeographicLevel::Pincode, "110001")?;
//! ```

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::concerns::ConcernStore;
use crate::config::{BoardConfig, ConfigError};
use crate::domain::{Concern, ConcernId, GeographicLevel, NewConcern, UserId, Vote, VoteType};
use crate::leaderboard::{LeaderboardAggregator, LeaderboardPage, PageRequest};
use crate::ledger::{Tally, VoteLedger};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::model::{InMemoryRecordStore, RecordStore};
use crate::voting::{CastVote, VotingCoordinator};
use crate::CoreError;

/// Stored counters next to the ledger replay for one concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterCheck {
    pub stored: Tally,
    pub ledger: Tally,
}

impl CounterCheck {
    pub fn is_consistent(&self) -> bool {
        self.stored == self.ledger
    }
}

pub struct ConcernBoard<S = InMemoryRecordStore, L = InMemoryLockManager> {
    concerns: Arc<ConcernStore<S>>,
    ledger: Arc<VoteLedger<S>>,
    leaderboard: LeaderboardAggregator<S>,
    voting: VotingCoordinator<S, L>,
    config: BoardConfig,
}

impl ConcernBoard {
    /// In-memory board on the wall clock with default limits.
    pub fn new() -> Self {
        Self::assemble(
            InMemoryRecordStore::new(),
            InMemoryLockManager::new(),
            Arc::new(SystemClock),
            BoardConfig::default(),
        )
    }

    pub fn in_memory(config: BoardConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        Self::with_parts(
            InMemoryRecordStore::new(),
            InMemoryLockManager::new(),
            clock,
            config,
        )
    }
}

impl Default for ConcernBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RecordStore + Clone, L: LockManager> ConcernBoard<S, L> {
    pub fn with_parts(
        store: S,
        locks: L,
        clock: Arc<dyn Clock>,
        config: BoardConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(store, locks, clock, config))
    }

    fn assemble(store: S, locks: L, clock: Arc<dyn Clock>, config: BoardConfig) -> Self {
        let attempts = config.max_write_attempts;
        let concerns = Arc::new(ConcernStore::new(store.clone(), clock.clone(), config.clone()));
        let ledger = Arc::new(VoteLedger::new(store.clone()));
        let leaderboard = LeaderboardAggregator::new(
            store.clone(),
            concerns.index().clone(),
            config.default_page_size,
            config.max_page_size,
        );
        let voting = VotingCoordinator::new(
            store,
            concerns.clone(),
            ledger.clone(),
            locks,
            clock,
            attempts,
        );
        Self {
            concerns,
            ledger,
            leaderboard,
            voting,
            config,
        }
    }

    /// Post a concern. Posting does not require an identity.
    pub fn submit_concern(
        &self,
        author_id: Option<UserId>,
        author_display_name: Option<String>,
        text: &str,
        geographic_level: GeographicLevel,
        location_identifier: &str,
    ) -> Result<ConcernId, CoreError> {
        self.submit(NewConcern {
            author_id,
            author_display_name,
            text: text.to_string(),
            geographic_level,
            location_identifier: location_identifier.to_string(),
        })
    }

    pub fn submit(&self, new: NewConcern) -> Result<ConcernId, CoreError> {
        self.concerns.create(new)
    }

    /// Ranked snapshot of one bucket; re-query to see later votes.
    pub fn list_leaderboard(
        &self,
        geographic_level: GeographicLevel,
        location_identifier: &str,
    ) -> Result<Vec<Concern>, CoreError> {
        self.leaderboard.query(geographic_level, location_identifier)
    }

    pub fn list_leaderboard_page(
        &self,
        geographic_level: GeographicLevel,
        location_identifier: &str,
        request: PageRequest,
    ) -> Result<LeaderboardPage, CoreError> {
        self.leaderboard
            .query_page(geographic_level, location_identifier, request)
    }

    pub fn cast_vote(
        &self,
        user_id: Option<&UserId>,
        concern_id: ConcernId,
        vote_type: VoteType,
    ) -> Result<Concern, CoreError> {
        self.voting.cast_vote(user_id, concern_id, vote_type)
    }

    /// Cast a vote from untyped request fields, e.g. `("…uuid…", "upvote")`.
    pub fn cast_vote_raw(
        &self,
        user_id: Option<&UserId>,
        concern_id: &str,
        vote_type: &str,
    ) -> Result<Concern, CoreError> {
        if user_id.map_or(true, UserId::is_blank) {
            return Err(CoreError::IdentityRequired);
        }
        let concern_id: ConcernId = concern_id.parse()?;
        let vote_type: VoteType = vote_type.parse()?;
        self.cast_vote(user_id, concern_id, vote_type)
    }

    pub fn cast(
        &self,
        user_id: Option<&UserId>,
        concern_id: ConcernId,
        vote_type: VoteType,
    ) -> Result<CastVote, CoreError> {
        self.voting.cast(user_id, concern_id, vote_type)
    }

    pub fn get_concern(&self, concern_id: ConcernId) -> Result<Concern, CoreError> {
        self.concerns.get(concern_id)
    }

    pub fn get_vote(
        &self,
        user_id: &UserId,
        concern_id: ConcernId,
    ) -> Result<Option<Vote>, CoreError> {
        self.ledger.get_vote(user_id, concern_id)
    }

    /// Locations at `level` that have at least one concern.
    pub fn locations(&self, geographic_level: GeographicLevel) -> Result<Vec<String>, CoreError> {
        self.concerns.index().locations(geographic_level)
    }

    /// Every standing vote on a concern, oldest change first.
    pub fn votes_for_concern(&self, concern_id: ConcernId) -> Result<Vec<Vote>, CoreError> {
        self.ledger.votes_for_concern(concern_id)
    }

    /// Compare a concern's stored counters with a replay of its ledger.
    pub fn verify_counters(&self, concern_id: ConcernId) -> Result<CounterCheck, CoreError> {
        let concern = self.concerns.get(concern_id)?;
        let ledger = self.ledger.tally(concern_id)?;
        Ok(CounterCheck {
            stored: Tally {
                upvotes: concern.upvotes,
                downvotes: concern.downvotes,
            },
            ledger,
        })
    }

    pub fn leaderboard(&self) -> &LeaderboardAggregator<S> {
        &self.leaderboard
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }
}
