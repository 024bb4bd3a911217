use tracing::warn;

use crate::domain::ConcernId;
use crate::CoreError;

/// Run `op` until it stops failing with a store version conflict, at most
/// `attempts` times. `op` receives the 1-based attempt number and must not
/// leave partial writes behind when it fails.
pub(crate) fn retry_on_conflict<T>(
    concern_id: ConcernId,
    attempts: u32,
    mut op: impl FnMut(u32) -> Result<T, CoreError>,
) -> Result<T, CoreError> {
    for attempt in 1..=attempts {
        match op(attempt) {
            Err(CoreError::Store(err)) if err.is_conflict() => {
                warn!(%concern_id, attempt, error = %err, "write conflict, retrying");
            }
            other => return other,
        }
    }
    Err(CoreError::ConcurrencyConflict {
        concern_id,
        attempts,
    })
}
