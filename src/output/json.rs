//! JSON output formatting
//!
//! The report keeps raw nanosecond counters from the snapshot and adds
//! [`JsonDuration`] values (microseconds plus a human-readable string) for the
//! headline numbers.

use crate::coordinator::RunSummary;
use crate::scenario::OperationSummary;
use crate::stats::aggregator::WorkerCycles;
use crate::stats::snapshot::StatsSnapshot;
use crate::util::time::format_duration;
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Top-level JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub scenario: &'a str,
    pub operations: &'a [OperationSummary],
    pub started_at: &'a str,
    pub elapsed: JsonDuration,
    pub termination: String,
    pub threads: usize,
    pub seed: u64,
    pub timed_out: bool,
    pub abandoned_workers: usize,
    pub ops_per_sec: f64,
    pub stats: &'a StatsSnapshot,
    pub workers: &'a [WorkerCycles],
}

impl<'a> JsonReport<'a> {
    pub fn new(summary: &'a RunSummary) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            scenario: &summary.scenario,
            operations: &summary.operations,
            started_at: &summary.started_at,
            elapsed: JsonDuration::from_duration(summary.elapsed),
            termination: summary.termination.to_string(),
            threads: summary.threads,
            seed: summary.seed,
            timed_out: summary.timed_out,
            abandoned_workers: summary.abandoned_workers,
            ops_per_sec: summary.throughput(),
            stats: &summary.snapshot,
            workers: &summary.worker_cycles,
        }
    }
}

/// Serialize a run summary as pretty-printed JSON
pub fn to_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(summary)).context("Failed to serialize results to JSON")
}
