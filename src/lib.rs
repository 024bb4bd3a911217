//! Concern reports scoped to a geographic bucket, a vote ledger that keeps
//! one standing vote per user and concern, and leaderboards ranked by net
//! votes.
//!
//! Identity verification, transport and presentation live outside this
//! crate; callers hand in an already-verified [`UserId`].

// Lets `#[derive(Record)]` expand to `prajaavaani_core::Record` inside this crate too.
extern crate self as prajaavaani_core;

mod board;
mod clock;
mod concerns;
mod config;
mod domain;
mod error;
mod geo_index;
mod leaderboard;
mod ledger;
mod lock;
mod model;
mod retry;
mod voting;

pub use board::{ConcernBoard, CounterCheck};
pub use clock::{Clock, ManualClock, SystemClock};
pub use concerns::ConcernStore;
pub use config::{BoardConfig, ConfigError};
pub use domain::{
    Concern, ConcernId, GeographicLevel, NewConcern, UserId, Vote, VoteDelta, VoteId,
    VoteTransition, VoteType,
};
pub use error::{CoreError, ErrorKind};
pub use geo_index::{BucketEntry, GeographicIndex};
pub use leaderboard::{rank_order, LeaderboardAggregator, LeaderboardPage, PageRequest};
pub use ledger::{Tally, VoteLedger};
pub use lock::{InMemoryLockManager, LockError, LockGuard, LockManager};
pub use model::{
    Expectation, InMemoryRecordStore, Record, RecordStore, StoreError, Versioned, WriteBatch,
};
pub use voting::{CastVote, VotingCoordinator};

pub use prajaavaani_macros::Record;
