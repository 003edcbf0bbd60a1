//! Metric retention configuration
//!
//! Environment variables:
//! - TRIGGERD_LOCAL_METRIC_TTL: retention of the local metric source (default: 1h)
//! - TRIGGERD_REMOTE_METRIC_TTL: retention of the remote metric source (default: 168h)

use std::time::Duration;

use crate::target::{format_duration, parse_duration, DurationError};

pub const LOCAL_METRIC_TTL_ENV: &str = "TRIGGERD_LOCAL_METRIC_TTL";
pub const REMOTE_METRIC_TTL_ENV: &str = "TRIGGERD_REMOTE_METRIC_TTL";

/// Retention of the metric sources a trigger can read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricTtlConfig {
    pub local: Duration,
    pub remote: Duration,
}

impl MetricTtlConfig {
    pub fn new(local: Duration, remote: Duration) -> Self {
        Self { local, remote }
    }

    /// Read retention values from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            local: env_duration(LOCAL_METRIC_TTL_ENV)?.unwrap_or(defaults.local),
            remote: env_duration(REMOTE_METRIC_TTL_ENV)?.unwrap_or(defaults.remote),
        })
    }

    /// Retention that applies to a trigger reading from the given source
    pub fn for_trigger(&self, is_remote: bool) -> Duration {
        if is_remote {
            self.remote
        } else {
            self.local
        }
    }
}

impl Default for MetricTtlConfig {
    fn default() -> Self {
        Self {
            local: Duration::from_secs(3600),
            remote: Duration::from_secs(168 * 3600),
        }
    }
}

impl std::fmt::Display for MetricTtlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "local={} remote={}",
            format_duration(self.local),
            format_duration(self.remote)
        )
    }
}

fn env_duration(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_duration(value.trim())
            .map(Some)
            .map_err(|source| ConfigError::InvalidDuration { name, source }),
        _ => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name}: {source}")]
    InvalidDuration {
        name: &'static str,
        #[source]
        source: DurationError,
    },
}
