//! Scoped acquisition of the per-trigger check lock

use super::error::ApiError;
use crate::storage::Database;

/// TTL of the per-trigger check lock, in seconds
pub const CHECK_LOCK_TTL_SECS: u64 = 10;

/// Run `critical` while holding the check lock of `trigger_id`.
///
/// If the lock cannot be taken, `critical` is not run and nothing is released.
/// Once taken, the lock is released after `critical` returns, whatever the
/// outcome. A failed release is logged; the lock then lapses with its TTL.
pub fn with_check_lock<T, F>(db: &dyn Database, trigger_id: &str, critical: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError>,
{
    db.acquire_trigger_check_lock(trigger_id, CHECK_LOCK_TTL_SECS)
        .map_err(|e| {
            tracing::error!(trigger_id = %trigger_id, error = %e, "Failed to acquire check lock");
            ApiError::from(e)
        })?;
    tracing::debug!(trigger_id = %trigger_id, "Check lock acquired");

    let result = critical();

    match db.delete_trigger_check_lock(trigger_id) {
        Ok(()) => tracing::debug!(trigger_id = %trigger_id, "Check lock released"),
        Err(e) => tracing::warn!(
            trigger_id = %trigger_id,
            error = %e,
            "Failed to release check lock"
        ),
    }

    result
}
