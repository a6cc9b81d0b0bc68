//! Latency histograms using HdrHistogram
//!
//! Each worker owns a [`WorkerLatencies`] (one histogram per target and
//! operation kind) and records into it without any synchronization. The runner
//! merges them after the workers have reported back.
//!
//! # Example
//!
//! ```
//! use cachepulse::stats::histogram::LatencyHistogram;
//! use std::time::Duration;
//!
//! let mut hist = LatencyHistogram::new();
//! hist.record(Duration::from_micros(100));
//! hist.record(Duration::from_micros(150));
//! hist.record(Duration::from_micros(200));
//!
//! let p50 = hist.percentile(50.0).unwrap();
//! assert!(p50 >= Duration::from_micros(145) && p50 <= Duration::from_micros(155));
//! ```

use super::snapshot::LatencySummary;
use crate::operation::OperationKind;
use hdrhistogram::Histogram;
use std::time::Duration;

/// Largest trackable latency, 1 hour in nanoseconds
const MAX_LATENCY_NS: u64 = 3_600_000_000_000;

/// Latency histogram wrapper
///
/// Tracks 1ns to 1 hour with 3 significant digits (values within 0.1%).
/// Samples outside that range are clamped.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    pub fn new() -> Self {
        // Constant bounds, always valid
        let histogram = Histogram::new_with_bounds(1, MAX_LATENCY_NS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    #[inline]
    pub fn record(&mut self, latency: Duration) {
        let value = (latency.as_nanos() as u64).clamp(1, MAX_LATENCY_NS);
        let _ = self.histogram.record(value);
    }

    /// Latency at `percentile` (0.0 - 100.0), `None` if empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.value_at_percentile(percentile)))
    }

    pub fn min(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.min()))
    }

    pub fn max(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.max()))
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.mean() as u64))
    }

    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }

    /// Add the samples of `other` to this histogram
    ///
    /// Both sides share the same bounds, so merging cannot overflow the range.
    pub fn merge(&mut self, other: &LatencyHistogram) -> anyhow::Result<()> {
        self.histogram
            .add(&other.histogram)
            .map_err(|e| anyhow::anyhow!("Failed to merge histograms: {}", e))
    }

    /// Percentile summary, `None` if empty
    pub fn summary(&self) -> Option<LatencySummary> {
        if self.is_empty() {
            return None;
        }
        let h = &self.histogram;
        Some(LatencySummary {
            samples: h.len(),
            min_ns: h.min(),
            mean_ns: h.mean() as u64,
            p50_ns: h.value_at_percentile(50.0),
            p90_ns: h.value_at_percentile(90.0),
            p99_ns: h.value_at_percentile(99.0),
            p99_9_ns: h.value_at_percentile(99.9),
            max_ns: h.max(),
        })
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-worker latencies, one histogram per (target, kind)
#[derive(Debug, Clone)]
pub struct WorkerLatencies {
    targets: usize,
    histograms: Vec<LatencyHistogram>,
}

impl WorkerLatencies {
    pub fn new(targets: usize) -> Self {
        Self {
            targets,
            histograms: (0..targets * OperationKind::COUNT)
                .map(|_| LatencyHistogram::new())
                .collect(),
        }
    }

    pub fn targets(&self) -> usize {
        self.targets
    }

    #[inline]
    fn index(target: usize, kind: OperationKind) -> usize {
        target * OperationKind::COUNT + kind.index()
    }

    #[inline]
    pub fn record(&mut self, target: usize, kind: OperationKind, latency: Duration) {
        if let Some(hist) = self.histograms.get_mut(Self::index(target, kind)) {
            hist.record(latency);
        }
    }

    pub fn histogram(&self, target: usize, kind: OperationKind) -> Option<&LatencyHistogram> {
        self.histograms.get(Self::index(target, kind))
    }

    /// Samples recorded for (target, kind)
    pub fn samples(&self, target: usize, kind: OperationKind) -> u64 {
        self.histogram(target, kind).map_or(0, LatencyHistogram::len)
    }

    /// Merge another worker's latencies into these
    ///
    /// # Errors
    ///
    /// Fails if the two sides were built for a different number of targets.
    pub fn merge(&mut self, other: &WorkerLatencies) -> anyhow::Result<()> {
        if other.targets != self.targets {
            anyhow::bail!(
                "Cannot merge latencies for {} targets into {} targets",
                other.targets,
                self.targets
            );
        }
        for (mine, theirs) in self.histograms.iter_mut().zip(&other.histograms) {
            mine.merge(theirs)?;
        }
        Ok(())
    }
}
