//! Trigger definition types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How warn/error thresholds are compared against metric values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Value above threshold is bad
    #[default]
    Rising,
    /// Value below threshold is bad
    Falling,
    /// State is computed by a custom expression
    Expression,
}

/// State a metric is moved to when it stops receiving data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TtlState {
    Ok,
    Warn,
    Error,
    #[default]
    Nodata,
    Del,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub name: String,
    pub enabled: bool,
}

/// Weekly schedule during which the trigger may notify
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleData {
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
    /// Minutes from midnight
    pub start_offset: i64,
    /// Minutes from midnight
    pub end_offset: i64,
    /// Minutes relative to UTC
    pub tz_offset: i64,
}

/// A named rule monitoring metric-query targets against threshold conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Unique trigger ID (caller supplied or generated on create)
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Metric-query expressions, evaluated in order
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_value: Option<f64>,
    #[serde(default)]
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_state: Option<TtlState>,
    /// Seconds without data before `ttl_state` applies
    #[serde(default)]
    pub ttl: i64,
    #[serde(default, rename = "sched", skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Metric-path patterns derived from `targets`
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Evaluate against the remote metric source instead of the local one
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub mute_new_metrics: bool,
    #[serde(default)]
    pub alone_metrics: HashMap<String, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trigger {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        targets: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            targets,
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_thresholds(mut self, warn: Option<f64>, error: Option<f64>) -> Self {
        self.warn_value = warn;
        self.error_value = error;
        self
    }

    pub fn with_remote(mut self, is_remote: bool) -> Self {
        self.is_remote = is_remote;
        self
    }

    /// Check the fields that do not require parsing targets
    pub fn validate(&self) -> Result<(), TriggerError> {
        if self.name.trim().is_empty() {
            return Err(TriggerError::MissingName);
        }
        if self.targets.is_empty() {
            return Err(TriggerError::MissingTargets);
        }
        if self.tags.is_empty() {
            return Err(TriggerError::MissingTags);
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(TriggerError::EmptyTag);
        }

        match self.trigger_type {
            TriggerType::Expression => {
                let has_expression = self
                    .expression
                    .as_deref()
                    .is_some_and(|e| !e.trim().is_empty());
                if !has_expression {
                    return Err(TriggerError::MissingExpression);
                }
            }
            TriggerType::Rising | TriggerType::Falling => {
                if self.warn_value.is_none() && self.error_value.is_none() {
                    return Err(TriggerError::MissingThresholds);
                }
                if let (Some(warn), Some(error)) = (self.warn_value, self.error_value) {
                    let ordered = match self.trigger_type {
                        TriggerType::Rising => warn <= error,
                        _ => warn >= error,
                    };
                    if !ordered {
                        return Err(TriggerError::ThresholdOrder(self.trigger_type));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Trigger definition errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriggerError {
    #[error("trigger name is required")]
    MissingName,

    #[error("targets are required")]
    MissingTargets,

    #[error("tags are required")]
    MissingTags,

    #[error("tag name can not be empty")]
    EmptyTag,

    #[error("expression is required for expression trigger")]
    MissingExpression,

    #[error("at least one of error_value and warn_value is required")]
    MissingThresholds,

    #[error("warn_value and error_value are in the wrong order for a {0:?} trigger")]
    ThresholdOrder(TriggerType),
}
