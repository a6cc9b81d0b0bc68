//! Worker thread implementation
//!
//! A worker is the execution unit of a run. Each one runs on its own OS thread
//! and repeats the same cycle until told to stop:
//!
//! 1. claim a cycle from the shared [`RunControl`] (stop flag + iteration budget)
//! 2. draw a sequence number from the shared [`SequenceGenerator`]
//! 3. let the [`Scenario`] pick an operation, or nothing for an idle cycle
//! 4. run the operation against every target, recording into the shared
//!    [`StatisticsRegistry`] and the worker's own latency histograms
//!
//! Nothing in the loop allocates or locks on the harness side. When the loop
//! ends the worker returns a [`WorkerReport`] that the runner aggregates.

use crate::distribution::randomizer::Randomizer;
use crate::generator::sequence::SequenceGenerator;
use crate::scenario::Scenario;
use crate::stats::histogram::WorkerLatencies;
use crate::stats::StatisticsRegistry;
use crate::target::CacheTargets;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shared termination state of one run phase
///
/// Workers check it once per cycle. The iteration budget is claimed
/// cluster-wide with a single `fetch_add`, so the total number of executed
/// cycles equals the budget exactly regardless of how they spread over workers.
#[derive(Debug)]
pub struct RunControl {
    stop: AtomicBool,
    budget: Option<u64>,
    claimed: AtomicU64,
}

impl RunControl {
    /// Runs until stopped
    pub fn unlimited() -> Self {
        Self {
            stop: AtomicBool::new(false),
            budget: None,
            claimed: AtomicU64::new(0),
        }
    }

    /// Runs until `iterations` cycles have been claimed, or until stopped
    pub fn with_budget(iterations: u64) -> Self {
        Self {
            budget: Some(iterations),
            ..Self::unlimited()
        }
    }

    /// Reserve one cycle; `false` means the worker must exit
    #[inline]
    pub fn claim(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return false;
        }
        match self.budget {
            Some(budget) => self.claimed.fetch_add(1, Ordering::Relaxed) < budget,
            None => true,
        }
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// What a worker hands back when its loop ends
#[derive(Debug)]
pub struct WorkerReport {
    pub id: usize,
    pub cycles: u64,
    pub latencies: WorkerLatencies,
}

/// Worker thread that executes scenario cycles
///
/// Every field is shared with the other workers of the same phase; the only
/// state a worker owns is its sequential-scenario cursor and its latency
/// histograms.
pub struct Worker<K, V> {
    id: usize,
    scenario: Arc<Scenario<K, V>>,
    targets: Arc<CacheTargets<K, V>>,
    sequence: Arc<dyn SequenceGenerator>,
    randomizer: Randomizer,
    stats: Arc<StatisticsRegistry>,
    control: Arc<RunControl>,
}

impl<K, V> Worker<K, V>
where
    K: Clone,
    V: Clone,
{
    pub fn new(
        id: usize,
        scenario: Arc<Scenario<K, V>>,
        targets: Arc<CacheTargets<K, V>>,
        sequence: Arc<dyn SequenceGenerator>,
        randomizer: Randomizer,
        stats: Arc<StatisticsRegistry>,
        control: Arc<RunControl>,
    ) -> Self {
        Self {
            id,
            scenario,
            targets,
            sequence,
            randomizer,
            stats,
            control,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Run cycles until the control says stop
    pub fn run(self) -> WorkerReport {
        debug!(worker = self.id, "worker started");

        let mut latencies = WorkerLatencies::new(self.targets.len());
        let mut cursor = 0usize;
        let mut cycles = 0u64;

        while self.control.claim() {
            let seq = self.sequence.next();
            self.stats.record_cycle(self.id);

            match self.scenario.pick(seq, &self.randomizer, &mut cursor) {
                Some(op) => op.execute(
                    seq,
                    &self.randomizer,
                    &self.targets,
                    &self.stats,
                    self.id,
                    &mut latencies,
                ),
                None => self.stats.record_idle(self.id),
            }
            cycles += 1;
        }

        debug!(worker = self.id, cycles, "worker stopped");

        WorkerReport {
            id: self.id,
            cycles,
            latencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::sequence::AtomicSequence;
    use crate::generator::LongGenerator;
    use crate::operation::{Operation, OperationKind, Outcome};
    use crate::target::memory::InMemoryCache;
    use crate::target::Cache;

    fn worker(
        scenario: Scenario<u64, u64>,
        control: Arc<RunControl>,
        sequence: Arc<AtomicSequence>,
    ) -> (Worker<u64, u64>, Arc<StatisticsRegistry>) {
        let cache: Arc<dyn Cache<u64, u64>> = Arc::new(InMemoryCache::new());
        let targets = Arc::new(CacheTargets::new(vec![("mem".to_string(), cache)]).unwrap());
        let stats = Arc::new(StatisticsRegistry::new(targets.names(), 1));
        let worker = Worker::new(
            0,
            Arc::new(scenario),
            targets,
            sequence,
            Randomizer::default(),
            stats.clone(),
            control,
        );
        (worker, stats)
    }

    #[test]
    fn test_budget_claims_exact() {
        let control = RunControl::with_budget(3);
        assert!(control.claim());
        assert!(control.claim());
        assert!(control.claim());
        assert!(!control.claim());
        assert!(!control.claim());
    }

    #[test]
    fn test_stop_overrides_budget() {
        let control = RunControl::unlimited();
        assert!(control.claim());
        control.stop();
        assert!(control.is_stopped());
        assert!(!control.claim());
    }

    #[test]
    fn test_sequential_worker_runs_budget() {
        let scenario = Scenario::new(
            "put-then-get",
            vec![
                Operation::put(LongGenerator, LongGenerator),
                Operation::get(LongGenerator),
            ],
        )
        .unwrap();
        let sequence = Arc::new(AtomicSequence::new());
        let (worker, stats) = worker(scenario, Arc::new(RunControl::with_budget(100)), sequence.clone());

        let report = worker.run();
        assert_eq!(report.cycles, 100);
        assert_eq!(sequence.peek(), 100);

        let snapshot = stats.peek();
        assert_eq!(snapshot.cycles, 100);
        assert_eq!(snapshot.idle_cycles, 0);
        assert_eq!(snapshot.total(OperationKind::Put, Outcome::Put), 50);
        // Each get reads the key written by the put one sequence number earlier,
        // which is a different key under the sequential distribution
        assert_eq!(snapshot.total(OperationKind::Get, Outcome::Miss), 50);
        assert_eq!(report.latencies.samples(0, OperationKind::Put), 50);
    }

    #[test]
    fn test_idle_cycles_counted() {
        let scenario = Scenario::new(
            "mostly-idle",
            vec![Operation::<u64, u64>::get(LongGenerator).with_weight(0.2)],
        )
        .unwrap();
        let (worker, stats) = worker(
            scenario,
            Arc::new(RunControl::with_budget(10_000)),
            Arc::new(AtomicSequence::new()),
        );

        worker.run();
        let snapshot = stats.peek();
        assert_eq!(snapshot.cycles, 10_000);
        assert_eq!(snapshot.idle_cycles + snapshot.total_ops(), 10_000);
        let idle = snapshot.idle_cycles as f64 / 10_000.0;
        assert!((idle - 0.8).abs() < 0.03, "idle fraction {}", idle);
    }
}
