//! Immutable statistics views
//!
//! A [`StatsSnapshot`] is an owned copy taken by
//! [`StatisticsRegistry::peek`](super::StatisticsRegistry::peek). It keeps the
//! arena's shape: targets in declaration order, every operation kind, and for
//! each kind only the outcomes it can legally produce.

use crate::operation::{OperationKind, Outcome};
use serde::Serialize;
use std::time::Duration;

/// Counters for one (target, kind, outcome) cell
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct OutcomeStats {
    pub outcome: Outcome,
    pub count: u64,
    pub total_latency_ns: u64,
    pub max_latency_ns: u64,
}

impl OutcomeStats {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            count: 0,
            total_latency_ns: 0,
            max_latency_ns: 0,
        }
    }

    pub fn mean_latency(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.total_latency_ns / self.count))
    }
}

/// Latency distribution of one (target, kind), merged across workers
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LatencySummary {
    pub samples: u64,
    pub min_ns: u64,
    pub mean_ns: u64,
    pub p50_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
    pub p99_9_ns: u64,
    pub max_ns: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OperationStats {
    pub kind: OperationKind,
    pub outcomes: Vec<OutcomeStats>,
    /// Only present once the run is done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencySummary>,
}

impl OperationStats {
    pub fn outcome(&self, outcome: Outcome) -> Option<&OutcomeStats> {
        self.outcomes.iter().find(|o| o.outcome == outcome)
    }

    /// Calls of this kind, whatever their outcome
    pub fn total(&self) -> u64 {
        self.outcomes.iter().map(|o| o.count).sum()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TargetStats {
    pub name: String,
    pub operations: Vec<OperationStats>,
}

impl TargetStats {
    pub fn operation(&self, kind: OperationKind) -> Option<&OperationStats> {
        self.operations.iter().find(|op| op.kind == kind)
    }

    pub fn operation_mut(&mut self, kind: OperationKind) -> Option<&mut OperationStats> {
        self.operations.iter_mut().find(|op| op.kind == kind)
    }

    pub fn total_ops(&self) -> u64 {
        self.operations.iter().map(OperationStats::total).sum()
    }
}

/// Point-in-time statistics for a run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSnapshot {
    pub targets: Vec<TargetStats>,
    /// Worker cycles, including idle ones
    pub cycles: u64,
    /// Cycles on which the weight table selected no operation
    pub idle_cycles: u64,
}

impl StatsSnapshot {
    pub fn target(&self, name: &str) -> Option<&TargetStats> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn outcome(&self, target: &str, kind: OperationKind, outcome: Outcome) -> Option<&OutcomeStats> {
        self.target(target)?.operation(kind)?.outcome(outcome)
    }

    /// Count for one cell, zero if the cell does not exist
    pub fn count(&self, target: &str, kind: OperationKind, outcome: Outcome) -> u64 {
        self.outcome(target, kind, outcome).map_or(0, |o| o.count)
    }

    /// Count for (kind, outcome) summed over all targets
    pub fn total(&self, kind: OperationKind, outcome: Outcome) -> u64 {
        self.targets
            .iter()
            .filter_map(|t| t.operation(kind)?.outcome(outcome))
            .map(|o| o.count)
            .sum()
    }

    /// Calls of `kind` over all targets and outcomes
    ///
    /// Counts target calls, not cycles: every cycle that selects `kind` calls
    /// each target once, so with N targets this is N times the number of such
    /// cycles.
    pub fn kind_total(&self, kind: OperationKind) -> u64 {
        self.targets
            .iter()
            .filter_map(|t| t.operation(kind))
            .map(OperationStats::total)
            .sum()
    }

    /// Count of `outcome` over all targets and kinds
    pub fn outcome_total(&self, outcome: Outcome) -> u64 {
        OperationKind::ALL.iter().map(|&kind| self.total(kind, outcome)).sum()
    }

    /// Every recorded target call
    pub fn total_ops(&self) -> u64 {
        self.targets.iter().map(TargetStats::total_ops).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatisticsRegistry;

    #[test]
    fn test_snapshot_shape_follows_legal_outcomes() {
        let snapshot = StatisticsRegistry::new(vec!["a".to_string()], 1).peek();
        let target = snapshot.target("a").unwrap();

        assert_eq!(target.operations.len(), OperationKind::ALL.len());
        for op in &target.operations {
            let outcomes: Vec<Outcome> = op.outcomes.iter().map(|o| o.outcome).collect();
            assert_eq!(outcomes, op.kind.outcomes());
        }
        assert!(snapshot.outcome("a", OperationKind::Put, Outcome::Miss).is_none());
        assert_eq!(snapshot.count("missing", OperationKind::Get, Outcome::Get), 0);
    }

    #[test]
    fn test_totals() {
        let stats = StatisticsRegistry::new(vec!["a".to_string(), "b".to_string()], 1);
        stats.record(0, 0, OperationKind::Get, Outcome::Miss, Duration::ZERO);
        stats.record(0, 1, OperationKind::Get, Outcome::Miss, Duration::ZERO);
        stats.record(0, 1, OperationKind::Remove, Outcome::Miss, Duration::ZERO);
        stats.record(0, 1, OperationKind::Put, Outcome::Exception, Duration::ZERO);

        let snapshot = stats.peek();
        assert_eq!(snapshot.total(OperationKind::Get, Outcome::Miss), 2);
        assert_eq!(snapshot.outcome_total(Outcome::Miss), 3);
        assert_eq!(snapshot.kind_total(OperationKind::Put), 1);
        assert_eq!(snapshot.target("b").unwrap().total_ops(), 3);
        assert_eq!(snapshot.total_ops(), 4);
    }

    #[test]
    fn test_serializes_outcome_names() {
        let stats = StatisticsRegistry::new(vec!["a".to_string()], 1);
        stats.record(0, 0, OperationKind::Get, Outcome::Miss, Duration::from_nanos(10));
        let json = serde_json::to_value(stats.peek()).unwrap();

        let get = &json["targets"][0]["operations"][0];
        assert_eq!(get["kind"], "get");
        assert_eq!(get["outcomes"][1]["outcome"], "MISS");
        assert_eq!(get["outcomes"][1]["count"], 1);
        assert!(get.get("latency").is_none());
    }
}
