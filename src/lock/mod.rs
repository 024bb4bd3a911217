//! Per-concern mutual exclusion.
//!
//! Vote casting serializes on the concern id: the coordinator asks a
//! [`LockManager`] for the concern's lock and holds the returned
//! [`LockGuard`] for the whole read-compute-write sequence. Votes on
//! different concerns never wait on each other.

mod error;
mod guard;
mod in_memory;
mod lock_manager;

pub use error::LockError;
pub use guard::LockGuard;
pub use in_memory::InMemoryLockManager;
pub use lock_manager::LockManager;
