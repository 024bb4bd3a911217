//! VoteLedger - one standing vote per (user, concern); the source of truth
//! for concern counters.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{ConcernId, UserId, Vote, VoteId, VoteTransition, VoteType};
use crate::model::{RecordStore, WriteBatch};
use crate::CoreError;

/// Counters recomputed from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub upvotes: u64,
    pub downvotes: u64,
}

pub struct VoteLedger<S> {
    store: S,
}

impl<S: RecordStore + Clone> VoteLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_vote(
        &self,
        user_id: &UserId,
        concern_id: ConcernId,
    ) -> Result<Option<Vote>, CoreError> {
        let key = Vote::ledger_key(user_id, &concern_id);
        Ok(self.store.get_record::<Vote>(&key)?.map(|v| v.data))
    }

    /// Every standing vote on a concern, oldest change first.
    pub fn votes_for_concern(&self, concern_id: ConcernId) -> Result<Vec<Vote>, CoreError> {
        let mut votes: Vec<Vote> = self
            .store
            .find_by_key_prefix::<Vote>(&format!("{}/", concern_id))?
            .into_iter()
            .map(|v| v.data)
            .collect();
        votes.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(votes)
    }

    /// Replay the ledger for one concern into counters.
    pub fn tally(&self, concern_id: ConcernId) -> Result<Tally, CoreError> {
        let tally = self
            .votes_for_concern(concern_id)?
            .iter()
            .fold(Tally::default(), |mut tally, vote| {
                match vote.vote_type {
                    VoteType::Upvote => tally.upvotes += 1,
                    VoteType::Downvote => tally.downvotes += 1,
                }
                tally
            });
        Ok(tally)
    }

    /// Make `vote_type` the user's standing vote as part of `batch` and
    /// report the transition. A `NoOp` stages nothing.
    ///
    /// The ledger never moves without the matching counter delta, so only the
    /// voting coordinator calls this.
    pub(crate) fn upsert_vote(
        &self,
        batch: &mut WriteBatch,
        user_id: &UserId,
        concern_id: ConcernId,
        vote_type: VoteType,
        at: DateTime<Utc>,
    ) -> Result<VoteTransition, CoreError> {
        let key = Vote::ledger_key(user_id, &concern_id);
        let existing = self.store.get_record::<Vote>(&key)?;
        let transition =
            VoteTransition::between(existing.as_ref().map(|v| v.data.vote_type), vote_type);

        match (transition, existing) {
            (VoteTransition::NoOp(_), _) => {
                debug!(%concern_id, user_id = %user_id, %vote_type, "vote unchanged");
            }
            (_, Some(existing)) => {
                let vote = Vote {
                    vote_type,
                    timestamp: at,
                    ..existing.data
                };
                batch.update(&vote, existing.version)?;
            }
            (_, None) => {
                let vote = Vote {
                    id: VoteId::new(),
                    user_id: user_id.clone(),
                    concern_id,
                    vote_type,
                    timestamp: at,
                };
                batch.insert(&vote)?;
            }
        }

        Ok(transition)
    }
}
