//! Metric recording for cache resolution and warming
//!
//! These go through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use metrics::{counter, gauge};

use crate::domain::ResourceKind;

/// Outcome of one warming sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    Completed,
    Failed,
}

impl SweepOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            SweepOutcome::Completed => "completed",
            SweepOutcome::Failed => "failed",
        }
    }
}

pub fn record_cache_lookup(kind: ResourceKind, hit: bool) {
    if hit {
        counter!("registry_cache_hits_total", "kind" => kind.as_str()).increment(1);
    } else {
        counter!("registry_cache_misses_total", "kind" => kind.as_str()).increment(1);
    }
}

pub fn record_remote_failure(operation: &'static str) {
    counter!("registry_remote_failures_total", "operation" => operation).increment(1);
}

pub fn record_sweep(job: &'static str, outcome: SweepOutcome) {
    counter!(
        "registry_warming_sweeps_total",
        "job" => job,
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_warm_items(job: &'static str, items: usize) {
    gauge!("registry_warming_items", "job" => job).set(items as f64);
}
