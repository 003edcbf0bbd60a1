//! Notification throttling window and the "is throttled" decision

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Throttling timestamps persisted per trigger.
///
/// Whether a trigger is throttled is never stored; it is computed from
/// `next_allowed` with [`resolve_throttling`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottlingWindow {
    /// Earliest time the next notification may be sent
    pub next_allowed: DateTime<Utc>,
    /// Start of the current throttling window
    pub window_start: DateTime<Utc>,
}

impl ThrottlingWindow {
    pub fn new(next_allowed: DateTime<Utc>, window_start: DateTime<Utc>) -> Self {
        Self {
            next_allowed,
            window_start,
        }
    }

    /// Throttle value as seen at `now`
    pub fn resolve_at(&self, now: DateTime<Utc>) -> i64 {
        resolve_throttling(self.next_allowed, now)
    }
}

impl Default for ThrottlingWindow {
    fn default() -> Self {
        Self::new(DateTime::UNIX_EPOCH, DateTime::UNIX_EPOCH)
    }
}

/// Unix seconds of `next_allowed` if it lies strictly after `now`, otherwise 0.
pub fn resolve_throttling(next_allowed: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if next_allowed > now {
        next_allowed.timestamp()
    } else {
        0
    }
}
