//! Persisted evaluation state of a trigger ("last check")

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Evaluation state code of a trigger or one of its metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    #[default]
    Ok,
    Warn,
    Error,
    Nodata,
    Exception,
}

/// Last evaluation result of a single metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricState {
    pub state: State,
    /// Unix seconds of the last evaluated point
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Unix seconds of the last state change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<i64>,
    #[serde(default)]
    pub suppressed: bool,
    /// Notifications for this metric are muted until this unix time
    #[serde(default)]
    pub maintenance: i64,
}

/// Working memory of the trigger evaluation state machine, keyed by metric name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckData {
    #[serde(default)]
    pub metrics: HashMap<String, MetricState>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckData {
    /// Drop every metric that is not in `live`. Returns the number of entries removed.
    ///
    /// An empty `live` set clears all metrics.
    pub fn retain_metrics(&mut self, live: &HashSet<String>) -> usize {
        let before = self.metrics.len();
        self.metrics.retain(|name, _| live.contains(name));
        before - self.metrics.len()
    }

    /// Remove a single metric, returning its last state if it was tracked
    pub fn remove_metric(&mut self, name: &str) -> Option<MetricState> {
        self.metrics.remove(name)
    }
}
