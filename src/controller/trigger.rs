//! Trigger request orchestrators
//!
//! Save and metric-delete run their read-modify-write of the check state under
//! the per-trigger check lock, so for one trigger they never interleave.

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::dto::{SaveTriggerResponse, ThrottlingResponse, TriggerCheckResponse, TriggerResponse};
use super::error::ApiError;
use super::lock::with_check_lock;
use crate::model::Trigger;
use crate::storage::{Database, StoreError};
use crate::target::extract_patterns;

pub const TRIGGER_UPDATED: &str = "trigger updated";
pub const TRIGGER_CREATED: &str = "trigger created";

fn store_failure(trigger_id: &str, action: &'static str, err: StoreError) -> ApiError {
    tracing::error!(trigger_id = %trigger_id, error = %err, "Failed to {}", action);
    ApiError::from(err)
}

/// Validate a trigger definition and derive its patterns from its targets
pub fn prepare_trigger(trigger: &mut Trigger) -> Result<(), ApiError> {
    trigger.validate().map_err(ApiError::invalid_request)?;
    trigger.patterns = extract_patterns(&trigger.targets)
        .map_err(|e| ApiError::invalid_request(format!("Invalid graphite target: {}", e)))?;
    Ok(())
}

/// Persist `trigger` and drop check state of metrics not in `live_metrics`.
///
/// `live_metrics` are the metric names the new targets currently produce. An
/// empty set clears the whole check state.
pub fn save_trigger(
    db: &dyn Database,
    trigger: &Trigger,
    trigger_id: &str,
    live_metrics: &HashSet<String>,
) -> Result<SaveTriggerResponse, ApiError> {
    with_check_lock(db, trigger_id, || {
        let mut last_check = db
            .get_trigger_last_check(trigger_id)
            .map_err(|e| store_failure(trigger_id, "get last check", e))?
            .unwrap_or_default();

        let removed = last_check.retain_metrics(live_metrics);
        tracing::debug!(
            trigger_id = %trigger_id,
            removed,
            kept = last_check.metrics.len(),
            "Pruned check metrics"
        );

        db.set_trigger_last_check(trigger_id, &last_check)
            .map_err(|e| store_failure(trigger_id, "set last check", e))?;
        db.save_trigger(trigger_id, trigger)
            .map_err(|e| store_failure(trigger_id, "save trigger", e))
    })?;

    tracing::info!(trigger_id = %trigger_id, "Trigger saved");
    Ok(SaveTriggerResponse::new(trigger_id, TRIGGER_UPDATED))
}

/// Create a new trigger, generating an ID when the caller did not supply one
pub fn create_trigger(
    db: &dyn Database,
    mut trigger: Trigger,
    live_metrics: &HashSet<String>,
) -> Result<SaveTriggerResponse, ApiError> {
    if trigger.id.is_empty() {
        trigger.id = Uuid::new_v4().to_string();
    } else {
        let existing = db
            .get_trigger(&trigger.id)
            .map_err(|e| store_failure(&trigger.id, "get trigger", e))?;
        if existing.is_some() {
            return Err(ApiError::invalid_request("Trigger with this ID already exists"));
        }
    }

    prepare_trigger(&mut trigger)?;
    let now = Utc::now();
    trigger.created_at = Some(now);
    trigger.updated_at = Some(now);

    let id = trigger.id.clone();
    save_trigger(db, &trigger, &id, live_metrics)?;
    Ok(SaveTriggerResponse::new(id, TRIGGER_CREATED))
}

/// Replace the definition of an existing trigger
pub fn update_trigger(
    db: &dyn Database,
    trigger_id: &str,
    mut trigger: Trigger,
    live_metrics: &HashSet<String>,
) -> Result<SaveTriggerResponse, ApiError> {
    let existing = db
        .get_trigger(trigger_id)
        .map_err(|e| store_failure(trigger_id, "get trigger", e))?
        .ok_or_else(|| ApiError::not_found("Trigger not found"))?;

    trigger.id = trigger_id.to_string();
    prepare_trigger(&mut trigger)?;
    trigger.created_at = existing.created_at;
    trigger.updated_at = Some(Utc::now());

    save_trigger(db, &trigger, trigger_id, live_metrics)
}

pub fn get_trigger(db: &dyn Database, trigger_id: &str) -> Result<TriggerResponse, ApiError> {
    let trigger = db
        .get_trigger(trigger_id)
        .map_err(|e| store_failure(trigger_id, "get trigger", e))?
        .ok_or_else(|| ApiError::not_found("Trigger not found"))?;

    let throttling = db.get_trigger_throttling(trigger_id).resolve_at(Utc::now());
    Ok(TriggerResponse {
        trigger,
        throttling,
    })
}

/// Delete a trigger. Deleting an unknown ID succeeds if the store allows it.
pub fn delete_trigger(db: &dyn Database, trigger_id: &str) -> Result<(), ApiError> {
    db.delete_trigger(trigger_id)
        .map_err(|e| store_failure(trigger_id, "delete trigger", e))?;
    tracing::info!(trigger_id = %trigger_id, "Trigger deleted");
    Ok(())
}

pub fn get_trigger_throttling(
    db: &dyn Database,
    trigger_id: &str,
) -> Result<ThrottlingResponse, ApiError> {
    let throttling = db.get_trigger_throttling(trigger_id).resolve_at(Utc::now());
    Ok(ThrottlingResponse { throttling })
}

pub fn delete_trigger_throttling(db: &dyn Database, trigger_id: &str) -> Result<(), ApiError> {
    db.delete_trigger_throttling(trigger_id)
        .map_err(|e| store_failure(trigger_id, "delete throttling", e))
}

pub fn get_trigger_last_check(
    db: &dyn Database,
    trigger_id: &str,
) -> Result<TriggerCheckResponse, ApiError> {
    let check = db
        .get_trigger_last_check(trigger_id)
        .map_err(|e| store_failure(trigger_id, "get last check", e))?
        .ok_or_else(|| ApiError::not_found("Trigger check not found"))?;

    Ok(TriggerCheckResponse {
        trigger_id: trigger_id.to_string(),
        check,
    })
}

/// Forget the check state of one metric of a trigger
pub fn delete_trigger_metric(
    db: &dyn Database,
    metric_name: &str,
    trigger_id: &str,
) -> Result<(), ApiError> {
    let trigger = db
        .get_trigger(trigger_id)
        .map_err(|e| store_failure(trigger_id, "get trigger", e))?
        .ok_or_else(|| ApiError::invalid_request("Trigger not found"))?;

    with_check_lock(db, trigger_id, || {
        let mut last_check = db
            .get_trigger_last_check(trigger_id)
            .map_err(|e| store_failure(trigger_id, "get last check", e))?
            .ok_or_else(|| ApiError::invalid_request("Trigger check not found"))?;

        // Cleans up data of every pattern of the trigger, not only the deleted metric
        db.remove_patterns_metrics(&trigger.patterns)
            .map_err(|e| store_failure(trigger_id, "remove pattern metrics", e))?;

        if last_check.remove_metric(metric_name).is_some() {
            tracing::info!(trigger_id = %trigger_id, metric = %metric_name, "Metric removed from check state");
        }

        db.set_trigger_last_check(trigger_id, &last_check)
            .map_err(|e| store_failure(trigger_id, "set last check", e))
    })
}

/// Mute metrics of a trigger until the given unix times
pub fn set_metrics_maintenance(
    db: &dyn Database,
    trigger_id: &str,
    maintenance: &HashMap<String, i64>,
) -> Result<(), ApiError> {
    db.set_trigger_metrics_maintenance(trigger_id, maintenance)
        .map_err(|e| store_failure(trigger_id, "set metrics maintenance", e))
}
