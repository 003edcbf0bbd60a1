//! Response payloads of the request orchestrators

use serde::Serialize;

use crate::model::{CheckData, Trigger};
use crate::target::TargetVerification;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveTriggerResponse {
    pub id: String,
    pub message: String,
}

impl SaveTriggerResponse {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Trigger with its current throttle value (unix seconds, 0 when not throttled)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerResponse {
    #[serde(flatten)]
    pub trigger: Trigger,
    pub throttling: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThrottlingResponse {
    pub throttling: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerCheckResponse {
    pub trigger_id: String,
    #[serde(flatten)]
    pub check: CheckData,
}

/// Per-target verification results, in request order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckTargetsResponse {
    pub targets: Vec<TargetVerification>,
}
