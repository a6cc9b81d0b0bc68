//! Coordinator module
//!
//! Orchestrates workers and aggregates results.
//!
//! A [`Runner`] owns one validated scenario, one set of targets and one
//! [`RunConfig`], and executes them exactly once:
//!
//! ```text
//! CONFIGURING ──start()──► WARMUP (optional) ──► RUNNING ──► STOPPING ──► DONE
//! ```
//!
//! - **WARMUP**: the same worker loop for the warmup duration; its statistics
//!   go to a throw-away registry
//! - **RUNNING**: `threads` OS threads loop until the iteration budget is used
//!   up, the duration deadline passes, or the run timeout fires
//! - **STOPPING**: the stop flag is raised and workers finish their current
//!   cycle; the coordinator waits for their reports on a channel for at most
//!   the stop grace period, then abandons the stragglers
//! - **DONE**: counters and merged latencies form the [`RunSummary`]
//!
//! A timeout is not an error: the summary comes back with `timed_out` set.
//! Every phase passes through STOPPING, whether it ended on its own or was
//! stopped. A duration or timeout too large to represent as an instant is
//! treated as unbounded.
//!
//! # Example
//!
//! ```
//! use cachepulse::config::RunConfig;
//! use cachepulse::coordinator::Runner;
//! use cachepulse::generator::{bytes::ByteArrayGenerator, string::StringGenerator};
//! use cachepulse::operation::{Operation, OperationKind, Outcome};
//! use cachepulse::scenario::Scenario;
//! use cachepulse::target::{Cache, CacheTargets, memory::InMemoryCache};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let keys = StringGenerator::fixed_length(10);
//! let values = ByteArrayGenerator::fixed_length(32);
//! let scenario = Scenario::new("fill", vec![Operation::put(keys, values).with_weight(1.0)])?;
//!
//! let cache: Arc<dyn Cache<String, Vec<u8>>> = Arc::new(InMemoryCache::new());
//! let targets = CacheTargets::new(vec![("memory".to_string(), cache)])?;
//!
//! let config = RunConfig::new(2, Some(100), None, None, Duration::from_secs(30), 1)?;
//! let summary = Runner::new(scenario, targets, config).start()?;
//!
//! assert_eq!(summary.snapshot.total(OperationKind::Put, Outcome::Put), 100);
//! assert!(!summary.timed_out);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::workload::Termination;
use crate::config::RunConfig;
use crate::distribution::randomizer::Randomizer;
use crate::error::Error;
use crate::generator::sequence::AtomicSequence;
use crate::scenario::{OperationSummary, Scenario};
use crate::stats::aggregator::{StatisticsAggregator, WorkerCycles};
use crate::stats::snapshot::StatsSnapshot;
use crate::stats::StatisticsRegistry;
use crate::target::CacheTargets;
use crate::util::time::{calculate_rate, format_duration};
use crate::worker::{RunControl, Worker, WorkerReport};
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Lifecycle of a [`Runner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Configuring,
    Warmup,
    Running,
    Stopping,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Configuring => "CONFIGURING",
            RunState::Warmup => "WARMUP",
            RunState::Running => "RUNNING",
            RunState::Stopping => "STOPPING",
            RunState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Final, immutable result of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub operations: Vec<OperationSummary>,
    /// Wall-clock start, RFC 3339
    pub started_at: String,
    #[serde(serialize_with = "as_secs_f64")]
    pub elapsed: Duration,
    pub termination: Termination,
    pub threads: usize,
    pub seed: u64,
    pub snapshot: StatsSnapshot,
    /// The run timeout fired before the termination condition was met
    pub timed_out: bool,
    /// Workers that did not report back within the stop grace period
    pub abandoned_workers: usize,
    pub worker_cycles: Vec<WorkerCycles>,
}

impl RunSummary {
    /// Target calls per second over the measured phase
    pub fn throughput(&self) -> f64 {
        calculate_rate(self.snapshot.total_ops(), self.elapsed)
    }
}

fn as_secs_f64<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// What one phase produced
struct PhaseResult {
    reports: Vec<WorkerReport>,
    timed_out: bool,
    abandoned: usize,
}

/// Executes a scenario against cache targets, once
pub struct Runner<K, V> {
    scenario: Arc<Scenario<K, V>>,
    targets: Arc<CacheTargets<K, V>>,
    config: RunConfig,
    sequence: Arc<AtomicSequence>,
    state: RunState,
    history: Vec<RunState>,
}

impl<K, V> Runner<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(scenario: Scenario<K, V>, targets: CacheTargets<K, V>, config: RunConfig) -> Self {
        Self {
            scenario: Arc::new(scenario),
            targets: Arc::new(targets),
            config,
            sequence: Arc::new(AtomicSequence::new()),
            state: RunState::Configuring,
            history: vec![RunState::Configuring],
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every state entered so far, oldest first
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run warmup (if any) and the measured phase, then aggregate
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] when called more than once
    /// - [`Error::WorkerSpawn`] when the OS refuses a worker thread
    pub fn start(&mut self) -> Result<RunSummary, Error> {
        if self.state != RunState::Configuring {
            return Err(Error::InvalidState(self.state));
        }

        let started_at = chrono::Utc::now().to_rfc3339();
        let run_start = Instant::now();
        // None: the timeout lies beyond what Instant can represent
        let deadline = run_start.checked_add(self.config.timeout());
        let randomizer = Randomizer::new(self.config.seed());
        let threads = self.config.threads();

        info!(
            scenario = self.scenario.name(),
            threads,
            termination = %self.config.termination(),
            targets = self.targets.len(),
            "starting run"
        );

        let mut abandoned = 0;
        let mut timed_out = false;

        if let Some(warmup) = self.config.warmup() {
            self.transition(RunState::Warmup);
            let stats = Arc::new(StatisticsRegistry::new(self.targets.names(), threads));
            let control = Arc::new(RunControl::unlimited());
            let stop_at = Instant::now().checked_add(warmup);
            let phase = self.run_phase(stats, control, randomizer, stop_at, deadline)?;
            abandoned += phase.abandoned;
            timed_out = phase.timed_out;
            debug!(cycles = phase.reports.iter().map(|r| r.cycles).sum::<u64>(), "warmup finished");
        }

        let stats = Arc::new(StatisticsRegistry::new(self.targets.names(), threads));
        let mut aggregator = StatisticsAggregator::new(self.targets.len());
        let measured_start = Instant::now();

        if !timed_out {
            self.transition(RunState::Running);
            let (control, stop_at) = match self.config.termination() {
                Termination::Iterations(n) => (RunControl::with_budget(n), None),
                Termination::Duration(d) => (RunControl::unlimited(), measured_start.checked_add(d)),
            };
            let phase = self.run_phase(stats.clone(), Arc::new(control), randomizer, stop_at, deadline)?;
            abandoned += phase.abandoned;
            timed_out = phase.timed_out;
            for report in phase.reports {
                aggregator.add_worker(report.id, report.cycles, report.latencies);
            }
        } else {
            warn!("run timed out during warmup, skipping measured phase");
        }
        let elapsed = measured_start.elapsed();

        let counters = stats.peek();
        let snapshot = match aggregator.finish(counters.clone()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "failed to merge latency histograms");
                counters
            }
        };

        self.transition(RunState::Done);
        if timed_out {
            warn!(timeout = %format_duration(self.config.timeout()), "run timed out");
        }
        info!(
            total_ops = snapshot.total_ops(),
            cycles = snapshot.cycles,
            idle_cycles = snapshot.idle_cycles,
            elapsed = %format_duration(elapsed),
            "run finished"
        );

        Ok(RunSummary {
            scenario: self.scenario.name().to_string(),
            operations: self.scenario.operations().to_vec(),
            started_at,
            elapsed,
            termination: self.config.termination(),
            threads,
            seed: self.config.seed(),
            snapshot,
            timed_out,
            abandoned_workers: abandoned,
            worker_cycles: aggregator.worker_cycles(),
        })
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "state change");
        self.state = next;
        self.history.push(next);
    }

    /// Spawn the pool, wait for it to finish or be stopped, collect reports
    fn run_phase(
        &mut self,
        stats: Arc<StatisticsRegistry>,
        control: Arc<RunControl>,
        randomizer: Randomizer,
        stop_at: Option<Instant>,
        deadline: Option<Instant>,
    ) -> Result<PhaseResult, Error> {
        let threads = self.config.threads();
        let (tx, rx) = channel::unbounded();
        let mut handles: Vec<Option<JoinHandle<()>>> = Vec::with_capacity(threads);

        for id in 0..threads {
            let worker = Worker::new(
                id,
                self.scenario.clone(),
                self.targets.clone(),
                self.sequence.clone(),
                randomizer,
                stats.clone(),
                control.clone(),
            );
            let tx = tx.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("cachepulse-worker-{}", id))
                .spawn(move || {
                    let _ = tx.send(worker.run());
                });

            match spawned {
                Ok(handle) => handles.push(Some(handle)),
                Err(source) => {
                    // Already running workers exit at their next cycle
                    control.stop();
                    return Err(Error::WorkerSpawn { id, source });
                }
            }
        }
        drop(tx);

        let mut reports = Vec::with_capacity(threads);

        // Wait for natural completion, the duration deadline or the timeout
        let wake = earliest(stop_at, deadline);
        let finished = collect(&rx, &mut reports, threads, wake);
        let timed_out = !finished
            && deadline.map_or(false, |d| Instant::now() >= d && stop_at.map_or(true, |s| d <= s));

        self.transition(RunState::Stopping);
        control.stop();
        if !finished {
            let grace = Instant::now().checked_add(self.config.stop_grace());
            collect(&rx, &mut reports, threads, grace);
        }

        for report in &reports {
            if let Some(handle) = handles.get_mut(report.id).and_then(Option::take) {
                if handle.join().is_err() {
                    warn!(worker = report.id, "worker thread panicked after reporting");
                }
            }
        }

        let abandoned = threads - reports.len();
        if abandoned > 0 {
            warn!(
                abandoned,
                grace = %format_duration(self.config.stop_grace()),
                "workers did not stop within the grace period"
            );
        }

        Ok(PhaseResult {
            reports,
            timed_out,
            abandoned,
        })
    }
}

/// Earlier of two optional instants; `None` is unbounded
fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Receive reports until all `expected` arrived (true) or `until` passes
///
/// Without `until` this blocks until every report or every sender is gone.
fn collect(
    rx: &Receiver<WorkerReport>,
    reports: &mut Vec<WorkerReport>,
    expected: usize,
    until: Option<Instant>,
) -> bool {
    while reports.len() < expected {
        let received = match until {
            Some(until) => {
                let now = Instant::now();
                if now >= until {
                    return false;
                }
                match rx.recv_timeout(until - now) {
                    Ok(report) => Some(report),
                    Err(RecvTimeoutError::Timeout) => return false,
                    Err(RecvTimeoutError::Disconnected) => None,
                }
            }
            None => rx.recv().ok(),
        };
        match received {
            Some(report) => reports.push(report),
            // Every sender is gone: remaining workers died without reporting
            None => return reports.len() == expected,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::workload::DistributionType;
    use crate::error::ConfigError;
    use crate::generator::bytes::ByteArrayGenerator;
    use crate::generator::string::StringGenerator;
    use crate::generator::LongGenerator;
    use crate::operation::{Operation, OperationKind, Outcome};
    use crate::target::memory::InMemoryCache;
    use crate::target::mock::MockCache;
    use crate::target::Cache;

    const TIMEOUT: Duration = Duration::from_secs(60);

    fn memory_targets<K, V>() -> CacheTargets<K, V>
    where
        K: Eq + std::hash::Hash + Send + Sync + 'static,
        V: Clone + PartialEq + Send + Sync + 'static,
    {
        let cache: Arc<dyn Cache<K, V>> = Arc::new(InMemoryCache::new());
        CacheTargets::new(vec![("memory".to_string(), cache)]).unwrap()
    }

    fn iterations(threads: usize, n: u64) -> RunConfig {
        RunConfig::new(threads, Some(n), None, None, TIMEOUT, 1).unwrap()
    }

    #[test]
    fn test_put_only_exact_count() {
        let keys = StringGenerator::fixed_length(10);
        let values = ByteArrayGenerator::fixed_length(16);
        let scenario = Scenario::new("put", vec![Operation::put(keys, values).with_weight(1.0)]).unwrap();

        let mut runner = Runner::new(scenario, memory_targets(), iterations(4, 1000));
        let summary = runner.start().unwrap();

        assert_eq!(runner.state(), RunState::Done);
        assert_eq!(summary.snapshot.total(OperationKind::Put, Outcome::Put), 1000);
        assert_eq!(summary.snapshot.outcome_total(Outcome::Exception), 0);
        assert_eq!(summary.snapshot.cycles, 1000);
        assert_eq!(summary.worker_cycles.iter().map(|w| w.cycles).sum::<u64>(), 1000);
        assert_eq!(summary.worker_cycles.len(), 4);
        assert!(!summary.timed_out);
        assert_eq!(summary.abandoned_workers, 0);

        let put = summary.snapshot.target("memory").unwrap().operation(OperationKind::Put).unwrap();
        assert_eq!(put.latency.unwrap().samples, 1000);
    }

    #[test]
    fn test_always_failing_target() {
        let scenario =
            Scenario::new("fail", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let cache: Arc<dyn Cache<u64, u64>> = Arc::new(MockCache::failing());
        let targets = CacheTargets::new(vec![("broken".to_string(), cache)]).unwrap();

        let summary = Runner::new(scenario, targets, iterations(4, 1000)).start().unwrap();

        assert_eq!(summary.snapshot.total(OperationKind::Get, Outcome::Exception), 1000);
        assert_eq!(summary.snapshot.total_ops(), 1000);
        assert_eq!(summary.abandoned_workers, 0);
    }

    #[test]
    fn test_panicking_target_keeps_pool_alive() {
        let scenario =
            Scenario::new("panic", vec![Operation::<u64, u64>::put(LongGenerator, LongGenerator)]).unwrap();
        let cache: Arc<dyn Cache<u64, u64>> = Arc::new(MockCache::panicking());
        let targets = CacheTargets::new(vec![("broken".to_string(), cache)]).unwrap();

        let summary = Runner::new(scenario, targets, iterations(2, 200)).start().unwrap();

        assert_eq!(summary.snapshot.total(OperationKind::Put, Outcome::Exception), 200);
        assert_eq!(summary.worker_cycles.len(), 2);
    }

    #[test]
    fn test_weighted_gaussian_mix() {
        let keys = StringGenerator::fixed_length(10);
        let values = ByteArrayGenerator::fixed_length(16);
        let gaussian = DistributionType::gaussian(0, 10_000, 1_000.0);
        let scenario = Scenario::new(
            "mix",
            vec![
                Operation::get(keys).with_weight(0.8).with_distribution(gaussian),
                Operation::put(keys, values).with_weight(0.1).with_distribution(gaussian),
                Operation::remove(keys).with_weight(0.1).with_distribution(gaussian),
            ],
        )
        .unwrap();

        let workers = 4;
        let cycles_per_worker = 5_000;
        let total = workers as u64 * cycles_per_worker;
        let summary = Runner::new(scenario, memory_targets(), iterations(workers, total))
            .start()
            .unwrap();
        let snapshot = &summary.snapshot;

        let gets = snapshot.kind_total(OperationKind::Get);
        let puts = snapshot.kind_total(OperationKind::Put);
        let removes = snapshot.kind_total(OperationKind::Remove);

        assert_eq!(snapshot.cycles, total);
        assert_eq!(gets + puts + removes + snapshot.idle_cycles, total);

        let ratio = |n: u64| n as f64 / total as f64;
        assert!((ratio(gets) - 0.8).abs() < 0.02, "get ratio {}", ratio(gets));
        assert!((ratio(puts) - 0.1).abs() < 0.02, "put ratio {}", ratio(puts));
        assert!((ratio(removes) - 0.1).abs() < 0.02, "remove ratio {}", ratio(removes));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let build = || {
            Scenario::new(
                "replay",
                vec![
                    Operation::<u64, u64>::get(LongGenerator).with_weight(0.5),
                    Operation::put(LongGenerator, LongGenerator).with_weight(0.3),
                ],
            )
            .unwrap()
        };

        let first = Runner::new(build(), memory_targets(), iterations(3, 3000)).start().unwrap();
        let second = Runner::new(build(), memory_targets(), iterations(1, 3000)).start().unwrap();

        // Selection depends only on the sequence numbers, not on which thread drew them
        assert_eq!(first.snapshot.idle_cycles, second.snapshot.idle_cycles);
        assert_eq!(
            first.snapshot.kind_total(OperationKind::Get),
            second.snapshot.kind_total(OperationKind::Get)
        );
    }

    #[test]
    fn test_duration_termination() {
        let scenario = Scenario::new("timed", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let config = RunConfig::new(2, None, Some(Duration::from_millis(200)), None, TIMEOUT, 1).unwrap();

        let start = Instant::now();
        let summary = Runner::new(scenario, memory_targets(), config).start().unwrap();

        assert!(start.elapsed() >= Duration::from_millis(200));
        assert!(!summary.timed_out);
        assert!(summary.snapshot.cycles > 0);
        assert_eq!(summary.snapshot.total(OperationKind::Get, Outcome::Miss), summary.snapshot.cycles);
    }

    #[test]
    fn test_timeout_reported() {
        let scenario = Scenario::new("slow", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let cache: Arc<dyn Cache<u64, u64>> = Arc::new(MockCache::with_delay(Duration::from_millis(5)));
        let targets = CacheTargets::new(vec![("slow".to_string(), cache)]).unwrap();
        let config = RunConfig::new(2, Some(1_000_000), None, None, Duration::from_millis(150), 1).unwrap();

        let summary = Runner::new(scenario, targets, config).start().unwrap();

        assert!(summary.timed_out);
        assert_eq!(summary.abandoned_workers, 0);
        assert!(summary.snapshot.cycles < 1_000_000);
    }

    #[test]
    fn test_stuck_worker_abandoned() {
        let scenario = Scenario::new("stuck", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let cache: Arc<dyn Cache<u64, u64>> = Arc::new(MockCache::with_delay(Duration::from_millis(500)));
        let targets = CacheTargets::new(vec![("stuck".to_string(), cache)]).unwrap();
        let config = RunConfig::new(1, None, Some(Duration::from_millis(50)), None, TIMEOUT, 1)
            .unwrap()
            .with_stop_grace(Duration::from_millis(10));

        let summary = Runner::new(scenario, targets, config).start().unwrap();

        assert!(!summary.timed_out);
        assert_eq!(summary.abandoned_workers, 1);
        assert!(summary.worker_cycles.is_empty());
    }

    #[test]
    fn test_warmup_not_counted() {
        let scenario = Scenario::new("warm", vec![Operation::<u64, u64>::put(LongGenerator, LongGenerator)]).unwrap();
        let config = RunConfig::new(2, Some(500), None, Some(Duration::from_millis(50)), TIMEOUT, 1).unwrap();

        let summary = Runner::new(scenario, memory_targets(), config).start().unwrap();

        assert_eq!(summary.snapshot.total(OperationKind::Put, Outcome::Put), 500);
        assert_eq!(summary.snapshot.cycles, 500);
    }

    #[test]
    fn test_unbounded_timeout() {
        let scenario = Scenario::new("forever", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let config = RunConfig::new(2, Some(100), None, None, Duration::MAX, 1).unwrap();

        let summary = Runner::new(scenario, memory_targets(), config).start().unwrap();

        assert!(!summary.timed_out);
        assert_eq!(summary.snapshot.cycles, 100);
        assert_eq!(summary.abandoned_workers, 0);
    }

    #[test]
    fn test_unbounded_duration_ends_at_timeout() {
        let scenario = Scenario::new("endless", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let config = RunConfig::new(2, None, Some(Duration::MAX), None, Duration::from_millis(100), 1).unwrap();

        let start = Instant::now();
        let summary = Runner::new(scenario, memory_targets(), config).start().unwrap();

        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(summary.timed_out);
        assert_eq!(summary.abandoned_workers, 0);
        assert!(summary.snapshot.cycles > 0);
    }

    #[test]
    fn test_unbounded_warmup_ends_at_timeout() {
        let scenario = Scenario::new("cold", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let config = RunConfig::new(1, Some(10), None, Some(Duration::MAX), Duration::from_millis(100), 1).unwrap();

        let summary = Runner::new(scenario, memory_targets(), config).start().unwrap();

        assert!(summary.timed_out);
        // The measured phase never ran
        assert_eq!(summary.snapshot.cycles, 0);
    }

    #[test]
    fn test_natural_completion_passes_through_stopping() {
        let scenario = Scenario::new("states", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let mut runner = Runner::new(scenario, memory_targets(), iterations(2, 50));
        runner.start().unwrap();
        assert_eq!(
            runner.history(),
            &[RunState::Configuring, RunState::Running, RunState::Stopping, RunState::Done]
        );

        let scenario = Scenario::new("states", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let config = RunConfig::new(1, Some(50), None, Some(Duration::from_millis(20)), TIMEOUT, 1).unwrap();
        let mut runner = Runner::new(scenario, memory_targets(), config);
        runner.start().unwrap();
        assert_eq!(
            runner.history(),
            &[
                RunState::Configuring,
                RunState::Warmup,
                RunState::Stopping,
                RunState::Running,
                RunState::Stopping,
                RunState::Done,
            ]
        );
    }

    #[test]
    fn test_kind_total_counts_every_target() {
        let scenario = Scenario::new("fanout", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let targets = CacheTargets::new(vec![
            ("a".to_string(), Arc::new(InMemoryCache::new()) as Arc<dyn Cache<u64, u64>>),
            ("b".to_string(), Arc::new(MockCache::new())),
        ])
        .unwrap();

        let summary = Runner::new(scenario, targets, iterations(3, 300)).start().unwrap();
        let snapshot = &summary.snapshot;

        assert_eq!(snapshot.cycles, 300);
        assert_eq!(snapshot.kind_total(OperationKind::Get), 300 * 2);
        assert_eq!(snapshot.count("a", OperationKind::Get, Outcome::Miss), 300);
        assert_eq!(snapshot.count("b", OperationKind::Get, Outcome::Miss), 300);
        assert_eq!(summary.worker_cycles.iter().map(|w| w.cycles).sum::<u64>(), 300);
    }

    #[test]
    fn test_start_twice_rejected() {
        let scenario = Scenario::new("once", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let mut runner = Runner::new(scenario, memory_targets(), iterations(1, 10));
        runner.start().unwrap();

        match runner.start() {
            Err(Error::InvalidState(RunState::Done)) => {}
            other => panic!("unexpected result: {:?}", other.map(|s| s.snapshot.cycles)),
        }
    }

    #[test]
    fn test_summary_serializes() {
        let scenario = Scenario::new("json", vec![Operation::<u64, u64>::get(LongGenerator)]).unwrap();
        let summary = Runner::new(scenario, memory_targets(), iterations(1, 10)).start().unwrap();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["scenario"], "json");
        assert_eq!(json["timed_out"], false);
        assert_eq!(json["snapshot"]["cycles"], 10);
        assert!(json["elapsed"].is_f64());
    }

    #[test]
    fn test_invalid_config_never_reaches_runner() {
        assert_eq!(
            RunConfig::new(1, None, None, None, TIMEOUT, 1).unwrap_err(),
            ConfigError::MissingTermination
        );
    }
}
