//! Request orchestrators over a [`Database`](crate::storage::Database)

pub mod check;
pub mod dto;
pub mod error;
pub mod lock;
pub mod trigger;

#[cfg(test)]
pub(crate) mod test_support;

pub use check::{check_targets, check_trigger};
pub use dto::{
    CheckTargetsResponse, SaveTriggerResponse, ThrottlingResponse, TriggerCheckResponse,
    TriggerResponse,
};
pub use error::ApiError;
pub use lock::{with_check_lock, CHECK_LOCK_TTL_SECS};
pub use trigger::{
    create_trigger, delete_trigger, delete_trigger_metric, delete_trigger_throttling,
    get_trigger, get_trigger_last_check, get_trigger_throttling, prepare_trigger, save_trigger,
    set_metrics_maintenance, update_trigger, TRIGGER_CREATED, TRIGGER_UPDATED,
};
