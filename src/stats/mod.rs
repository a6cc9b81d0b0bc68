//! Statistics collection
//!
//! Lock-free outcome counters with cache-line aligned atomics.
//!
//! Every target call lands in exactly one slot of a fixed arena indexed by
//! `(target, operation kind, outcome)`. The arena is sized once at construction
//! and never grows, so recording is a handful of relaxed atomic adds with no
//! allocation and no lock.
//!
//! - **Sharding**: the arena is replicated per shard (one per worker by
//!   default) so workers rarely touch the same cache line
//! - **Cache-line alignment**: every counter sits on its own 64-byte line
//! - **Point-in-time view**: [`StatisticsRegistry::peek`] loads each counter
//!   once and sums the shards into an owned [`StatsSnapshot`]
//!
//! Latency percentiles are not tracked here. Workers keep their own
//! [`histogram::WorkerLatencies`] and the runner merges them once the run is
//! done (see [`aggregator`]).
//!
//! # Example
//!
//! ```
//! use cachepulse::operation::{OperationKind, Outcome};
//! use cachepulse::stats::StatisticsRegistry;
//!
//! let stats = StatisticsRegistry::new(vec!["primary".to_string()], 2);
//!
//! let (outcome, _elapsed) = stats.measure(0, 0, OperationKind::Get, || Outcome::Miss);
//! assert_eq!(outcome, Outcome::Miss);
//! stats.measure(1, 0, OperationKind::Get, || Outcome::Get);
//!
//! let snapshot = stats.peek();
//! assert_eq!(snapshot.total(OperationKind::Get, Outcome::Miss), 1);
//! assert_eq!(snapshot.total_ops(), 2);
//! ```

pub mod aggregator;
pub mod histogram;
pub mod snapshot;

use crate::operation::{OperationKind, Outcome};
use snapshot::{OperationStats, OutcomeStats, StatsSnapshot, TargetStats};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cache-line aligned atomic counter to prevent false sharing
///
/// ```text
/// [value: 8 bytes][padding: 56 bytes] = 64 bytes total
/// ```
#[repr(align(64))]
#[derive(Debug)]
pub struct AlignedCounter {
    value: AtomicU64,
    _padding: [u8; 56],
}

impl AlignedCounter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
            _padding: [0; 56],
        }
    }

    /// Add `val`; relaxed, counters carry no ordering between each other
    #[inline]
    pub fn add(&self, val: u64) {
        self.value.fetch_add(val, Ordering::Relaxed);
    }

    /// Raise the counter to `val` if it is lower
    #[inline]
    pub fn max(&self, val: u64) {
        self.value.fetch_max(val, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for AlignedCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for one (target, kind, outcome) cell
#[derive(Debug, Default)]
struct Slot {
    count: AlignedCounter,
    total_nanos: AlignedCounter,
    max_nanos: AlignedCounter,
}

const SLOTS_PER_TARGET: usize = OperationKind::COUNT * Outcome::COUNT;

#[derive(Debug)]
struct Shard {
    slots: Box<[Slot]>,
    cycles: AlignedCounter,
    idle: AlignedCounter,
}

impl Shard {
    fn new(targets: usize) -> Self {
        Self {
            slots: (0..targets * SLOTS_PER_TARGET).map(|_| Slot::default()).collect(),
            cycles: AlignedCounter::new(),
            idle: AlignedCounter::new(),
        }
    }
}

/// Shared outcome counters for a run
#[derive(Debug)]
pub struct StatisticsRegistry {
    targets: Vec<String>,
    shards: Box<[Shard]>,
}

impl StatisticsRegistry {
    /// Arena for `targets`, replicated `shards` times (at least once)
    pub fn new(targets: Vec<String>, shards: usize) -> Self {
        let shards = (0..shards.max(1)).map(|_| Shard::new(targets.len())).collect();
        Self { targets, shards }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    fn shard(&self, shard: usize) -> &Shard {
        &self.shards[shard % self.shards.len()]
    }

    #[inline]
    fn slot_index(target: usize, kind: OperationKind, outcome: Outcome) -> usize {
        target * SLOTS_PER_TARGET + kind.index() * Outcome::COUNT + outcome.index()
    }

    /// Time `task`, then count its outcome
    ///
    /// Runs synchronously on the calling thread. `shard` is normally the worker
    /// id; any value is accepted and wrapped onto the available shards.
    #[inline]
    pub fn measure<F>(&self, shard: usize, target: usize, kind: OperationKind, task: F) -> (Outcome, Duration)
    where
        F: FnOnce() -> Outcome,
    {
        let start = Instant::now();
        let outcome = task();
        let elapsed = start.elapsed();
        self.record(shard, target, kind, outcome, elapsed);
        (outcome, elapsed)
    }

    /// Count an already timed outcome
    #[inline]
    pub fn record(&self, shard: usize, target: usize, kind: OperationKind, outcome: Outcome, elapsed: Duration) {
        let nanos = elapsed.as_nanos() as u64;
        let slot = &self.shard(shard).slots[Self::slot_index(target, kind, outcome)];
        slot.count.add(1);
        slot.total_nanos.add(nanos);
        slot.max_nanos.max(nanos);
    }

    /// Count one worker cycle, idle or not
    #[inline]
    pub fn record_cycle(&self, shard: usize) {
        self.shard(shard).cycles.add(1);
    }

    /// Count a cycle on which no operation was selected
    #[inline]
    pub fn record_idle(&self, shard: usize) {
        self.shard(shard).idle.add(1);
    }

    /// Point-in-time copy of every counter
    ///
    /// Each counter is loaded exactly once. Counters may be slightly stale
    /// relative to each other while workers are running, but no value is torn
    /// and nothing is counted twice.
    pub fn peek(&self) -> StatsSnapshot {
        let targets = self
            .targets
            .iter()
            .enumerate()
            .map(|(target, name)| TargetStats {
                name: name.clone(),
                operations: OperationKind::ALL
                    .iter()
                    .map(|&kind| OperationStats {
                        kind,
                        outcomes: kind
                            .outcomes()
                            .iter()
                            .map(|&outcome| self.sum_slot(target, kind, outcome))
                            .collect(),
                        latency: None,
                    })
                    .collect(),
            })
            .collect();

        StatsSnapshot {
            targets,
            cycles: self.shards.iter().map(|s| s.cycles.get()).sum(),
            idle_cycles: self.shards.iter().map(|s| s.idle.get()).sum(),
        }
    }

    fn sum_slot(&self, target: usize, kind: OperationKind, outcome: Outcome) -> OutcomeStats {
        let index = Self::slot_index(target, kind, outcome);
        let mut stats = OutcomeStats::new(outcome);
        for shard in self.shards.iter() {
            let slot = &shard.slots[index];
            stats.count += slot.count.get();
            stats.total_latency_ns += slot.total_nanos.get();
            stats.max_latency_ns = stats.max_latency_ns.max(slot.max_nanos.get());
        }
        stats
    }
}
