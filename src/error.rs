use crate::domain::ConcernId;
use crate::lock::LockError;
use crate::model::StoreError;

/// Coarse classification of a [`CoreError`] for the caller layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    IdentityRequired,
    ConcurrencyConflict,
    Internal,
}

/// Per-request failure of a board operation. None of these are fatal to the
/// process, and none are retried by the caller automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("concern not found: {concern_id}")]
    NotFound { concern_id: ConcernId },

    #[error("voting requires an authenticated user")]
    IdentityRequired,

    #[error("concern {concern_id} kept changing underneath {attempts} write attempts")]
    ConcurrencyConflict { concern_id: ConcernId, attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl CoreError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation { .. } => ErrorKind::Validation,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::IdentityRequired => ErrorKind::IdentityRequired,
            CoreError::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
            CoreError::Store(_) | CoreError::Lock(_) => ErrorKind::Internal,
        }
    }
}
