//! Human-readable text output

use crate::coordinator::RunSummary;
use crate::operation::Outcome;
use crate::stats::snapshot::{LatencySummary, OperationStats};
use crate::util::time::{calculate_rate, format_duration, format_rate};
use std::fmt::Write;
use std::time::Duration;

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Print run results to stdout
pub fn print_results(summary: &RunSummary, outcomes: Option<&[Outcome]>) {
    print!("{}", format_results(summary, outcomes));
}

/// Render run results
///
/// Sections:
/// - run header (scenario, termination, elapsed, throughput)
/// - per target: every operation kind that was called, its outcomes and latency
/// - cycle accounting (idle cycles, per-worker split)
///
/// `outcomes` limits the per-outcome lines to the listed outcomes; `None`
/// shows all of them. Operation totals are never filtered.
pub fn format_results(summary: &RunSummary, outcomes: Option<&[Outcome]>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_results(&mut out, summary, outcomes);
    out
}

fn write_results(out: &mut String, summary: &RunSummary, outcomes: Option<&[Outcome]>) -> std::fmt::Result {
    let snapshot = &summary.snapshot;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "                    RUN RESULTS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;

    writeln!(out, "Scenario:    {}", summary.scenario)?;
    for op in &summary.operations {
        writeln!(out, "  - {}", op)?;
    }
    writeln!(out, "Started:     {}", summary.started_at)?;
    writeln!(out, "Termination: {}", summary.termination)?;
    writeln!(out, "Threads:     {}", summary.threads)?;
    writeln!(out, "Elapsed:     {:.3}s", summary.elapsed.as_secs_f64())?;
    writeln!(
        out,
        "Throughput:  {} ops/s ({} ops)",
        format_rate(summary.throughput()),
        format_number(snapshot.total_ops())
    )?;
    if summary.timed_out {
        writeln!(out, "Status:      TIMED OUT")?;
    }
    if summary.abandoned_workers > 0 {
        writeln!(out, "Abandoned:   {} worker(s) did not stop in time", summary.abandoned_workers)?;
    }
    writeln!(out)?;

    for target in &snapshot.targets {
        writeln!(out, "Target '{}':", target.name)?;
        let mut any = false;
        for op in target.operations.iter().filter(|op| op.total() > 0) {
            any = true;
            write_operation(out, op, summary.elapsed, outcomes)?;
        }
        if !any {
            writeln!(out, "  No operations recorded")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Cycles:")?;
    writeln!(out, "  Total: {}", format_number(snapshot.cycles))?;
    if snapshot.cycles > 0 {
        writeln!(
            out,
            "  Idle:  {} ({:.2}%)",
            format_number(snapshot.idle_cycles),
            snapshot.idle_cycles as f64 * 100.0 / snapshot.cycles as f64
        )?;
    }
    for worker in &summary.worker_cycles {
        writeln!(out, "  Worker {:>3}: {}", worker.worker, format_number(worker.cycles))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

fn write_operation(
    out: &mut String,
    op: &OperationStats,
    elapsed: Duration,
    reported: Option<&[Outcome]>,
) -> std::fmt::Result {
    let total = op.total();
    writeln!(
        out,
        "  {:<25} {:>12} ops  {:>10} ops/s",
        op.kind.as_str(),
        format_number(total),
        format_rate(calculate_rate(total, elapsed))
    )?;

    let shown = |outcome: Outcome| reported.map_or(true, |list| list.contains(&outcome));
    for outcome in op.outcomes.iter().filter(|o| o.count > 0 && shown(o.outcome)) {
        let mean = outcome.mean_latency().map(format_duration).unwrap_or_default();
        writeln!(
            out,
            "    {:<23} {:>12}  mean {:>9}  max {:>9}",
            outcome.outcome.as_str(),
            format_number(outcome.count),
            mean,
            format_duration(Duration::from_nanos(outcome.max_latency_ns))
        )?;
    }

    if let Some(latency) = &op.latency {
        write_latency(out, latency)?;
    }
    Ok(())
}

fn write_latency(out: &mut String, latency: &LatencySummary) -> std::fmt::Result {
    let d = Duration::from_nanos;
    writeln!(
        out,
        "    latency                 p50 {}  p90 {}  p99 {}  p99.9 {}  max {}",
        format_duration(d(latency.p50_ns)),
        format_duration(d(latency.p90_ns)),
        format_duration(d(latency.p99_ns)),
        format_duration(d(latency.p99_9_ns)),
        format_duration(d(latency.max_ns))
    )
}

/// Format number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
