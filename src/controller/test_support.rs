//! Store double that records calls and injects failures

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use crate::model::{CheckData, ThrottlingWindow, Trigger};
use crate::storage::{Database, InMemoryDatabase, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    AcquireLock,
    ReleaseLock,
    GetTrigger,
    SaveTrigger,
    DeleteTrigger,
    GetLastCheck,
    SetLastCheck,
    GetThrottling,
    DeleteThrottling,
    RemovePatternsMetrics,
    SetMaintenance,
}

pub struct RecordingDatabase {
    pub inner: InMemoryDatabase,
    calls: Mutex<Vec<Op>>,
    failing: Mutex<HashSet<Op>>,
    removed_patterns: Mutex<Vec<Vec<String>>>,
}

impl RecordingDatabase {
    pub fn new() -> Self {
        Self::with_inner(InMemoryDatabase::new())
    }

    pub fn with_inner(inner: InMemoryDatabase) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            removed_patterns: Mutex::new(Vec::new()),
        }
    }

    /// Make every later call of `op` fail with `"<op> error"`
    pub fn fail(&self, op: Op) {
        self.failing.lock().insert(op);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls.lock().iter().filter(|c| **c == op).count()
    }

    pub fn removed_patterns(&self) -> Vec<Vec<String>> {
        self.removed_patterns.lock().clone()
    }

    fn record(&self, op: Op) -> Result<(), StoreError> {
        self.calls.lock().push(op);
        if self.failing.lock().contains(&op) {
            Err(StoreError::Backend(format!("{:?} error", op)))
        } else {
            Ok(())
        }
    }
}

impl Database for RecordingDatabase {
    fn acquire_trigger_check_lock(&self, trigger_id: &str, ttl_secs: u64) -> Result<(), StoreError> {
        self.record(Op::AcquireLock)?;
        self.inner.acquire_trigger_check_lock(trigger_id, ttl_secs)
    }

    fn delete_trigger_check_lock(&self, trigger_id: &str) -> Result<(), StoreError> {
        self.record(Op::ReleaseLock)?;
        self.inner.delete_trigger_check_lock(trigger_id)
    }

    fn get_trigger(&self, trigger_id: &str) -> Result<Option<Trigger>, StoreError> {
        self.record(Op::GetTrigger)?;
        self.inner.get_trigger(trigger_id)
    }

    fn save_trigger(&self, trigger_id: &str, trigger: &Trigger) -> Result<(), StoreError> {
        self.record(Op::SaveTrigger)?;
        self.inner.save_trigger(trigger_id, trigger)
    }

    fn delete_trigger(&self, trigger_id: &str) -> Result<(), StoreError> {
        self.record(Op::DeleteTrigger)?;
        self.inner.delete_trigger(trigger_id)
    }

    fn get_trigger_last_check(&self, trigger_id: &str) -> Result<Option<CheckData>, StoreError> {
        self.record(Op::GetLastCheck)?;
        self.inner.get_trigger_last_check(trigger_id)
    }

    fn set_trigger_last_check(&self, trigger_id: &str, check: &CheckData) -> Result<(), StoreError> {
        self.record(Op::SetLastCheck)?;
        self.inner.set_trigger_last_check(trigger_id, check)
    }

    fn get_trigger_throttling(&self, trigger_id: &str) -> ThrottlingWindow {
        self.calls.lock().push(Op::GetThrottling);
        self.inner.get_trigger_throttling(trigger_id)
    }

    fn delete_trigger_throttling(&self, trigger_id: &str) -> Result<(), StoreError> {
        self.record(Op::DeleteThrottling)?;
        self.inner.delete_trigger_throttling(trigger_id)
    }

    fn remove_patterns_metrics(&self, patterns: &[String]) -> Result<(), StoreError> {
        self.removed_patterns.lock().push(patterns.to_vec());
        self.record(Op::RemovePatternsMetrics)?;
        self.inner.remove_patterns_metrics(patterns)
    }

    fn set_trigger_metrics_maintenance(
        &self,
        trigger_id: &str,
        maintenance: &HashMap<String, i64>,
    ) -> Result<(), StoreError> {
        self.record(Op::SetMaintenance)?;
        self.inner.set_trigger_metrics_maintenance(trigger_id, maintenance)
    }
}
