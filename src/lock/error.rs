/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    /// The lock table was poisoned by a thread that panicked while holding it.
    #[error("concern lock table poisoned: {0}")]
    Poisoned(String),
}
