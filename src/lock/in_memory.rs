use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tracing::trace;

use super::{LockError, LockGuard, LockManager};
use crate::domain::ConcernId;

#[derive(Default)]
struct Slot {
    held: bool,
    waiters: usize,
    wake: Arc<Condvar>,
}

/// In-memory per-concern locks over one table guarded by a `Mutex`, with a
/// `Condvar` per concern for waiters.
///
/// A concern has a slot only while its lock is held or awaited. The last
/// release removes the slot, so the table never outgrows the votes in
/// flight, whatever ids callers ask for.
#[derive(Clone, Default)]
pub struct InMemoryLockManager {
    slots: Arc<Mutex<HashMap<ConcernId, Slot>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of concerns whose lock is currently held or awaited.
    pub fn active(&self) -> Result<usize, LockError> {
        Ok(self.table()?.len())
    }

    fn table(&self) -> Result<MutexGuard<'_, HashMap<ConcernId, Slot>>, LockError> {
        self.slots
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))
    }
}

impl LockManager for InMemoryLockManager {
    fn acquire(&self, concern_id: ConcernId) -> Result<LockGuard<'_>, LockError> {
        let mut table = self.table()?;
        let wake = {
            let slot = table.entry(concern_id).or_default();
            if !slot.held {
                slot.held = true;
                return Ok(LockGuard::new(concern_id, self));
            }
            slot.waiters += 1;
            Arc::clone(&slot.wake)
        };

        trace!(%concern_id, "waiting for concern lock");
        loop {
            table = wake
                .wait(table)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
            let slot = table.entry(concern_id).or_default();
            if !slot.held {
                slot.held = true;
                slot.waiters = slot.waiters.saturating_sub(1);
                return Ok(LockGuard::new(concern_id, self));
            }
        }
    }

    fn try_acquire(&self, concern_id: ConcernId) -> Result<Option<LockGuard<'_>>, LockError> {
        let mut table = self.table()?;
        let slot = table.entry(concern_id).or_default();
        if slot.held {
            return Ok(None);
        }
        slot.held = true;
        Ok(Some(LockGuard::new(concern_id, self)))
    }

    fn release(&self, concern_id: ConcernId) -> Result<(), LockError> {
        let mut table = self.table()?;
        let idle = match table.get_mut(&concern_id) {
            Some(slot) => {
                slot.held = false;
                if slot.waiters > 0 {
                    slot.wake.notify_one();
                }
                slot.waiters == 0
            }
            None => false,
        };
        if idle {
            table.remove(&concern_id);
        }
        Ok(())
    }
}
