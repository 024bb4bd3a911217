//! Domain types: concerns, votes, identities and geographic levels.

mod concern;
mod ids;
mod level;
mod vote;

pub use concern::{Concern, NewConcern};
pub use ids::{ConcernId, UserId, VoteId};
pub use level::GeographicLevel;
pub use vote::{Vote, VoteDelta, VoteTransition, VoteType};
