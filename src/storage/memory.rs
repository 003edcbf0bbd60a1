//! In-process store implementing [`Database`]
//!
//! Used by the binary and by tests. Locks expire after their TTL so a crashed
//! holder cannot wedge a trigger.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use super::database::{Database, StoreError};
use super::pattern::glob_to_regex;
use crate::model::{CheckData, ThrottlingWindow, Trigger};

/// How long `acquire_trigger_check_lock` waits for a held lock
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(1);
/// Poll interval while waiting for a held lock
pub const DEFAULT_LOCK_RETRY: Duration = Duration::from_millis(50);

pub struct InMemoryDatabase {
    triggers: DashMap<String, Trigger>,
    last_checks: DashMap<String, CheckData>,
    throttling: DashMap<String, ThrottlingWindow>,
    /// Lock expiry per trigger ID
    locks: DashMap<String, Instant>,
    /// Names of metrics with stored data
    metrics: RwLock<BTreeSet<String>>,
    lock_wait: Duration,
    lock_retry: Duration,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self {
            triggers: DashMap::new(),
            last_checks: DashMap::new(),
            throttling: DashMap::new(),
            locks: DashMap::new(),
            metrics: RwLock::new(BTreeSet::new()),
            lock_wait: DEFAULT_LOCK_WAIT,
            lock_retry: DEFAULT_LOCK_RETRY,
        }
    }

    /// Set the bounded wait used when a lock is held by someone else
    pub fn with_lock_wait(mut self, wait: Duration, retry: Duration) -> Self {
        self.lock_wait = wait;
        self.lock_retry = retry;
        self
    }

    pub fn set_trigger_throttling(&self, trigger_id: &str, window: ThrottlingWindow) {
        self.throttling.insert(trigger_id.to_string(), window);
    }

    /// Record that data exists for a metric
    pub fn add_metric(&self, name: impl Into<String>) {
        self.metrics.write().insert(name.into());
    }

    pub fn metric_names(&self) -> Vec<String> {
        self.metrics.read().iter().cloned().collect()
    }

    pub fn is_locked(&self, trigger_id: &str) -> bool {
        self.locks
            .get(trigger_id)
            .map(|expiry| *expiry > Instant::now())
            .unwrap_or(false)
    }

    fn try_lock(&self, trigger_id: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        match self.locks.entry(trigger_id.to_string()) {
            Entry::Occupied(mut held) => {
                if *held.get() <= now {
                    tracing::debug!(trigger_id = %trigger_id, "Taking over expired check lock");
                    held.insert(now + ttl);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(free) => {
                free.insert(now + ttl);
                true
            }
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Database for InMemoryDatabase {
    fn acquire_trigger_check_lock(&self, trigger_id: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let ttl = Duration::from_secs(ttl_secs);
        let started = Instant::now();

        loop {
            if self.try_lock(trigger_id, ttl) {
                return Ok(());
            }
            let waited = started.elapsed();
            if waited >= self.lock_wait {
                return Err(StoreError::LockNotAcquired {
                    trigger_id: trigger_id.to_string(),
                    waited,
                });
            }
            std::thread::sleep(self.lock_retry);
        }
    }

    fn delete_trigger_check_lock(&self, trigger_id: &str) -> Result<(), StoreError> {
        self.locks.remove(trigger_id);
        Ok(())
    }

    fn get_trigger(&self, trigger_id: &str) -> Result<Option<Trigger>, StoreError> {
        Ok(self.triggers.get(trigger_id).map(|t| t.clone()))
    }

    fn save_trigger(&self, trigger_id: &str, trigger: &Trigger) -> Result<(), StoreError> {
        self.triggers.insert(trigger_id.to_string(), trigger.clone());
        Ok(())
    }

    fn delete_trigger(&self, trigger_id: &str) -> Result<(), StoreError> {
        self.triggers.remove(trigger_id);
        self.last_checks.remove(trigger_id);
        self.throttling.remove(trigger_id);
        Ok(())
    }

    fn get_trigger_last_check(&self, trigger_id: &str) -> Result<Option<CheckData>, StoreError> {
        Ok(self.last_checks.get(trigger_id).map(|c| c.clone()))
    }

    fn set_trigger_last_check(&self, trigger_id: &str, check: &CheckData) -> Result<(), StoreError> {
        self.last_checks.insert(trigger_id.to_string(), check.clone());
        Ok(())
    }

    fn get_trigger_throttling(&self, trigger_id: &str) -> ThrottlingWindow {
        self.throttling
            .get(trigger_id)
            .map(|w| *w)
            .unwrap_or_default()
    }

    fn delete_trigger_throttling(&self, trigger_id: &str) -> Result<(), StoreError> {
        self.throttling.remove(trigger_id);
        Ok(())
    }

    fn remove_patterns_metrics(&self, patterns: &[String]) -> Result<(), StoreError> {
        let matchers = patterns
            .iter()
            .map(|p| glob_to_regex(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut metrics = self.metrics.write();
        let before = metrics.len();
        metrics.retain(|name| !matchers.iter().any(|re| re.is_match(name)));

        tracing::debug!(
            patterns = ?patterns,
            removed = before - metrics.len(),
            "Removed pattern metrics"
        );
        Ok(())
    }

    fn set_trigger_metrics_maintenance(
        &self,
        trigger_id: &str,
        maintenance: &HashMap<String, i64>,
    ) -> Result<(), StoreError> {
        if let Some(mut check) = self.last_checks.get_mut(trigger_id) {
            for (metric, until) in maintenance {
                if let Some(state) = check.metrics.get_mut(metric) {
                    state.maintenance = *until;
                }
            }
        }
        Ok(())
    }
}
