// src/backend/metrics.rs
use crate::storage::metrics::update_metrics;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Counters over the lifetime of the canister.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialMetrics {
    pub materials_created: u64,
    pub ready_transitions: u64,
    pub ready_transition_failures: u64,
    pub completions: u64,
    /// Indexed ids whose record was missing or unreadable during a listing.
    pub records_skipped: u64,
    pub orphans_reconciled: u64,
    pub failed_operations: u64,
}

/// Which counter an event bumps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricEvent {
    MaterialCreated,
    ReadyTransition,
    ReadyTransitionFailed,
    Completion,
    RecordSkipped,
    OrphanReconciled,
    OperationFailed,
}

/// Bumps a counter. Metrics are best effort; a failed write is only logged.
pub fn record(event: MetricEvent) {
    let result = update_metrics(|m| {
        let counter = match event {
            MetricEvent::MaterialCreated => &mut m.materials_created,
            MetricEvent::ReadyTransition => &mut m.ready_transitions,
            MetricEvent::ReadyTransitionFailed => &mut m.ready_transition_failures,
            MetricEvent::Completion => &mut m.completions,
            MetricEvent::RecordSkipped => &mut m.records_skipped,
            MetricEvent::OrphanReconciled => &mut m.orphans_reconciled,
            MetricEvent::OperationFailed => &mut m.failed_operations,
        };
        *counter = counter.saturating_add(1);
    });
    if let Err(e) = result {
        tracing::warn!("Metrics update for {:?} failed: {}", event, e);
    }
}

pub fn get_material_metrics() -> MaterialMetrics {
    crate::storage::metrics::get_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_bump_their_own_counter() {
        let before = get_material_metrics();
        record(MetricEvent::Completion);
        record(MetricEvent::RecordSkipped);
        record(MetricEvent::RecordSkipped);
        let after = get_material_metrics();
        assert_eq!(after.completions, before.completions + 1);
        assert_eq!(after.records_skipped, before.records_skipped + 2);
        assert_eq!(after.materials_created, before.materials_created);
    }
}
