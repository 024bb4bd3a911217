use crate::domain::ConcernId;

use super::LockManager;

/// Holds one concern's lock until dropped.
pub struct LockGuard<'a> {
    concern_id: ConcernId,
    manager: &'a dyn LockManager,
}

impl<'a> LockGuard<'a> {
    /// Wrap a lock `manager` has just granted for `concern_id`.
    pub fn new(concern_id: ConcernId, manager: &'a dyn LockManager) -> Self {
        Self {
            concern_id,
            manager,
        }
    }

    pub fn concern_id(&self) -> ConcernId {
        self.concern_id
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.manager.release(self.concern_id) {
            tracing::warn!(concern_id = %self.concern_id, error = %err, "failed to release concern lock");
        }
    }
}
