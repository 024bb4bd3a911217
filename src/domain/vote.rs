use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConcernId, UserId, VoteId};
use crate::{CoreError, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub const fn as_str(self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            _ => Err(CoreError::validation(
                "vote_type",
                format!("expected upvote or downvote, got {:?}", s),
            )),
        }
    }
}

/// A user's standing vote on one concern. At most one exists per
/// (user, concern); changing the vote rewrites this record in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub user_id: UserId,
    pub concern_id: ConcernId,
    pub vote_type: VoteType,
    /// Last time the vote type was set.
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    /// Ledger key for a (user, concern) pair. The concern id has a fixed
    /// width, so distinct pairs never share a key whatever the user id holds.
    pub fn ledger_key(user_id: &UserId, concern_id: &ConcernId) -> String {
        format!("{}/{}", concern_id, user_id)
    }
}

impl Record for Vote {
    const COLLECTION: &'static str = "votes";

    fn key(&self) -> String {
        Vote::ledger_key(&self.user_id, &self.concern_id)
    }
}

/// Counter change implied by a [`VoteTransition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoteDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteDelta {
    pub fn is_zero(&self) -> bool {
        self.upvotes == 0 && self.downvotes == 0
    }
}

/// How a cast vote changed the ledger entry for a (user, concern) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No prior vote existed.
    Created(VoteType),
    /// A prior vote of the other type was overwritten.
    Changed { from: VoteType, to: VoteType },
    /// The standing vote already had the requested type.
    NoOp(VoteType),
}

impl VoteTransition {
    /// Derive the transition from the standing vote (if any) and the requested type.
    pub fn between(existing: Option<VoteType>, requested: VoteType) -> Self {
        match existing {
            None => VoteTransition::Created(requested),
            Some(current) if current == requested => VoteTransition::NoOp(requested),
            Some(current) => VoteTransition::Changed {
                from: current,
                to: requested,
            },
        }
    }

    pub fn delta(&self) -> VoteDelta {
        match *self {
            VoteTransition::Created(VoteType::Upvote) => VoteDelta { upvotes: 1, downvotes: 0 },
            VoteTransition::Created(VoteType::Downvote) => VoteDelta { upvotes: 0, downvotes: 1 },
            VoteTransition::Changed {
                from: VoteType::Upvote,
                to: VoteType::Downvote,
            } => VoteDelta { upvotes: -1, downvotes: 1 },
            VoteTransition::Changed {
                from: VoteType::Downvote,
                to: VoteType::Upvote,
            } => VoteDelta { upvotes: 1, downvotes: -1 },
            VoteTransition::Changed { .. } | VoteTransition::NoOp(_) => VoteDelta::default(),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, VoteTransition::NoOp(_))
    }
}

impl fmt::Display for VoteTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTransition::Created(vote_type) => write!(f, "created({})", vote_type),
            VoteTransition::Changed { from, to } => write!(f, "changed({} -> {})", from, to),
            VoteTransition::NoOp(vote_type) => write!(f, "noop({})", vote_type),
        }
    }
}
