//! Statistics aggregation
//!
//! Collects what each worker hands back when it stops (its cycle count and its
//! private latency histograms) and folds it into the final snapshot.
//!
//! Outcome counters live in the shared
//! [`StatisticsRegistry`](super::StatisticsRegistry) and need no merging; only
//! the per-worker latency histograms do.
//!
//! # Example
//!
//! ```
//! use cachepulse::operation::{OperationKind, Outcome};
//! use cachepulse::stats::{StatisticsRegistry, aggregator::StatisticsAggregator};
//! use cachepulse::stats::histogram::WorkerLatencies;
//! use std::time::Duration;
//!
//! let stats = StatisticsRegistry::new(vec!["primary".to_string()], 2);
//! let mut aggregator = StatisticsAggregator::new(1);
//!
//! for worker in 0..2 {
//!     let mut latencies = WorkerLatencies::new(1);
//!     let (_, elapsed) = stats.measure(worker, 0, OperationKind::Put, || Outcome::Put);
//!     latencies.record(0, OperationKind::Put, elapsed);
//!     aggregator.add_worker(worker, 1, latencies);
//! }
//!
//! let snapshot = aggregator.finish(stats.peek())?;
//! let put = snapshot.target("primary").unwrap().operation(OperationKind::Put).unwrap();
//! assert_eq!(put.latency.unwrap().samples, 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::histogram::WorkerLatencies;
use super::snapshot::StatsSnapshot;
use crate::operation::OperationKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cycles executed by one worker
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WorkerCycles {
    pub worker: usize,
    pub cycles: u64,
}

/// Statistics aggregator for multiple workers
#[derive(Debug)]
pub struct StatisticsAggregator {
    targets: usize,
    /// worker_id → (cycles, latencies)
    workers: BTreeMap<usize, (u64, WorkerLatencies)>,
}

impl StatisticsAggregator {
    pub fn new(targets: usize) -> Self {
        Self {
            targets,
            workers: BTreeMap::new(),
        }
    }

    /// Add what a worker reported; a repeated id replaces the earlier report
    pub fn add_worker(&mut self, worker_id: usize, cycles: u64, latencies: WorkerLatencies) {
        self.workers.insert(worker_id, (cycles, latencies));
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Per-worker cycle counts, by ascending worker id
    pub fn worker_cycles(&self) -> Vec<WorkerCycles> {
        self.workers
            .iter()
            .map(|(&worker, (cycles, _))| WorkerCycles {
                worker,
                cycles: *cycles,
            })
            .collect()
    }

    /// All reported latencies merged together
    pub fn merged_latencies(&self) -> anyhow::Result<WorkerLatencies> {
        let mut merged = WorkerLatencies::new(self.targets);
        for (_, latencies) in self.workers.values() {
            merged.merge(latencies)?;
        }
        Ok(merged)
    }

    /// Attach latency percentiles to a counter snapshot
    ///
    /// Targets are matched by position, the same order the registry uses.
    pub fn finish(&self, mut snapshot: StatsSnapshot) -> anyhow::Result<StatsSnapshot> {
        let merged = self.merged_latencies()?;

        for (target, stats) in snapshot.targets.iter_mut().enumerate() {
            for kind in OperationKind::ALL {
                let summary = merged.histogram(target, kind).and_then(|h| h.summary());
                if let Some(op) = stats.operation_mut(kind) {
                    op.latency = summary;
                }
            }
        }

        Ok(snapshot)
    }
}
