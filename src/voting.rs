//! VotingCoordinator - applies a cast vote to the ledger and the concern's
//! counters as one unit, serialized per concern id.

use std::sync::Arc;

use tracing::info;

use crate::clock::Clock;
use crate::concerns::ConcernStore;
use crate::domain::{Concern, ConcernId, UserId, VoteTransition, VoteType};
use crate::ledger::VoteLedger;
use crate::lock::LockManager;
use crate::model::{RecordStore, WriteBatch};
use crate::retry::retry_on_conflict;
use crate::CoreError;

/// Outcome of a cast vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVote {
    pub concern: Concern,
    pub transition: VoteTransition,
}

pub struct VotingCoordinator<S, L> {
    store: S,
    concerns: Arc<ConcernStore<S>>,
    ledger: Arc<VoteLedger<S>>,
    locks: L,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl<S: RecordStore + Clone, L: LockManager> VotingCoordinator<S, L> {
    pub fn new(
        store: S,
        concerns: Arc<ConcernStore<S>>,
        ledger: Arc<VoteLedger<S>>,
        locks: L,
        clock: Arc<dyn Clock>,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            concerns,
            ledger,
            locks,
            clock,
            max_attempts,
        }
    }

    /// Make `vote_type` the user's standing vote and return the refreshed concern.
    pub fn cast_vote(
        &self,
        user_id: Option<&UserId>,
        concern_id: ConcernId,
        vote_type: VoteType,
    ) -> Result<Concern, CoreError> {
        Ok(self.cast(user_id, concern_id, vote_type)?.concern)
    }

    /// Like [`cast_vote`](Self::cast_vote) but also reports the ledger transition.
    pub fn cast(
        &self,
        user_id: Option<&UserId>,
        concern_id: ConcernId,
        vote_type: VoteType,
    ) -> Result<CastVote, CoreError> {
        let user_id = match user_id {
            Some(id) if !id.is_blank() => id,
            _ => return Err(CoreError::IdentityRequired),
        };

        // Unknown ids never reach the lock table.
        self.concerns.get_versioned(concern_id)?;

        // Votes on one concern are totally ordered by this lock; the version
        // checks in the batch still guard against writers that bypass it.
        let _guard = self.locks.acquire(concern_id)?;

        let outcome = retry_on_conflict(concern_id, self.max_attempts, |_| {
            let current = self.concerns.get_versioned(concern_id)?;
            let now = self.clock.now();

            let mut batch = WriteBatch::new();
            let transition =
                self.ledger
                    .upsert_vote(&mut batch, user_id, concern_id, vote_type, now)?;
            let concern =
                self.concerns
                    .apply_vote_delta(&mut batch, &current, transition.delta(), now)?;
            self.store.apply_batch(batch)?;

            Ok(CastVote {
                concern,
                transition,
            })
        })?;

        if !outcome.transition.is_noop() {
            info!(
                %concern_id,
                user_id = %user_id,
                transition = %outcome.transition,
                upvotes = outcome.concern.upvotes,
                downvotes = outcome.concern.downvotes,
                "vote applied"
            );
        }
        Ok(outcome)
    }
}
