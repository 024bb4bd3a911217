use crate::domain::ConcernId;

use super::{LockError, LockGuard};

/// Hands out one exclusive lock per concern id.
///
/// A shared deployment might back this with Postgres advisory locks keyed by
/// the concern id, or a lease in a KV store.
pub trait LockManager: Send + Sync {
    /// Block until the concern's lock is held. It is released when the guard
    /// drops.
    fn acquire(&self, concern_id: ConcernId) -> Result<LockGuard<'_>, LockError>;

    /// Like [`acquire`](Self::acquire) but returns `None` instead of waiting.
    fn try_acquire(&self, concern_id: ConcernId) -> Result<Option<LockGuard<'_>>, LockError>;

    /// Give the concern's lock back. Called by [`LockGuard`] on drop.
    fn release(&self, concern_id: ConcernId) -> Result<(), LockError>;
}
