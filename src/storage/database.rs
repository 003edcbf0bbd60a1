//! Store contract consumed by the request orchestrators

use std::collections::HashMap;
use std::time::Duration;

use crate::model::{CheckData, ThrottlingWindow, Trigger};

/// Persistent store holding triggers, their check state and the per-trigger lock.
///
/// Implementations must be safe to share between request workers. `Ok(None)`
/// from a getter means the key is absent; `Err` is reserved for store failures.
pub trait Database: Send + Sync {
    /// Take the per-trigger check lock, waiting a bounded time for a holder to release it
    fn acquire_trigger_check_lock(&self, trigger_id: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// Release the per-trigger check lock
    fn delete_trigger_check_lock(&self, trigger_id: &str) -> Result<(), StoreError>;

    fn get_trigger(&self, trigger_id: &str) -> Result<Option<Trigger>, StoreError>;

    fn save_trigger(&self, trigger_id: &str, trigger: &Trigger) -> Result<(), StoreError>;

    /// Delete a trigger together with its check state and throttling.
    /// Deleting an absent trigger is not an error.
    fn delete_trigger(&self, trigger_id: &str) -> Result<(), StoreError>;

    fn get_trigger_last_check(&self, trigger_id: &str) -> Result<Option<CheckData>, StoreError>;

    fn set_trigger_last_check(&self, trigger_id: &str, check: &CheckData) -> Result<(), StoreError>;

    /// Throttling timestamps; both are the unix epoch when nothing is stored
    fn get_trigger_throttling(&self, trigger_id: &str) -> ThrottlingWindow;

    fn delete_trigger_throttling(&self, trigger_id: &str) -> Result<(), StoreError>;

    /// Remove stored metric data matching any of `patterns`
    fn remove_patterns_metrics(&self, patterns: &[String]) -> Result<(), StoreError>;

    /// Mute metrics of a trigger until the given unix times
    fn set_trigger_metrics_maintenance(
        &self,
        trigger_id: &str,
        maintenance: &HashMap<String, i64>,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Lock for trigger '{trigger_id}' not acquired after {waited:?}")]
    LockNotAcquired { trigger_id: String, waited: Duration },

    #[error("Invalid pattern '{0}'")]
    InvalidPattern(String),

    #[error("Store error: {0}")]
    Backend(String),
}
