use rayon::prelude::*;

use super::dto::CheckTargetsResponse;
use crate::config::MetricTtlConfig;
use crate::model::Trigger;
use crate::target::TargetValidator;

/// Verify every target against the retention of the selected metric source.
///
/// Results keep the order of `targets`. Syntax and retention problems are
/// reported in the response, never as errors.
pub fn check_targets<S>(targets: &[S], is_remote: bool, ttl: &MetricTtlConfig) -> CheckTargetsResponse
where
    S: AsRef<str> + Sync,
{
    let validator = TargetValidator::new(ttl.for_trigger(is_remote), is_remote);
    let targets = targets
        .par_iter()
        .map(|target| validator.verify(target.as_ref()))
        .collect();

    CheckTargetsResponse { targets }
}

/// Verify the targets of a stored trigger
pub fn check_trigger(trigger: &Trigger, ttl: &MetricTtlConfig) -> CheckTargetsResponse {
    check_targets(&trigger.targets, trigger.is_remote, ttl)
}
