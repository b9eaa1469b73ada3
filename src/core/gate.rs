//! Gate evaluation
//!
//! Compares the measured ratio of one metric against a threshold.
//! The threshold range is validated by the caller (see `GateConfig::validate`).

use crate::core::models::{AggregateResult, GateDecision, Metric};

/// Evaluate the gate. Passes when `actual >= threshold`.
pub fn evaluate(aggregate: &AggregateResult, metric: Metric, threshold: f64) -> GateDecision {
    let actual = aggregate.ratio(metric.kind());
    let passed = actual >= threshold;

    tracing::debug!(
        metric = metric.as_str(),
        threshold,
        actual,
        passed,
        "gate evaluated"
    );

    GateDecision {
        metric,
        threshold,
        actual,
        passed,
    }
}
