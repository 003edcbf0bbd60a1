//! Trigger, check state and throttling data model

pub mod check;
pub mod throttling;
pub mod trigger;

pub use check::{CheckData, MetricState, State};
pub use throttling::{resolve_throttling, ThrottlingWindow};
pub use trigger::{ScheduleData, ScheduleDay, Trigger, TriggerError, TriggerType, TtlState};
