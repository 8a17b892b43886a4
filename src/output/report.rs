//! End-of-run report
//!
//! This module provides the summary produced by every run and its
//! text and JSON renderings.

use crate::config::StrategyKind;
use crate::crawler::{CrawlOutcome, GatewayStats};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Strategy that produced the run
    pub strategy: StrategyKind,

    /// Terminal state
    pub outcome: CrawlOutcome,

    /// Size of the discovered set
    pub names_discovered: usize,

    /// Prefixes taken off the frontier and looked up
    pub prefixes_expanded: u64,

    /// Prefixes still waiting when the run stopped
    pub frontier_remaining: usize,

    /// Prefixes ever pushed onto the frontier, seeds included
    pub prefixes_queued: u64,

    /// Lookup attempts issued, including retries
    pub lookups: u64,

    /// Lookup attempts that failed
    pub failed_attempts: u64,

    /// Prefixes given up on after exhausting retries
    pub abandoned_prefixes: u64,

    /// Snapshots successfully written
    pub snapshots_written: u64,

    /// Snapshot writes that failed
    pub snapshot_failures: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Fills in the gateway counters
    pub fn with_gateway_stats(mut self, stats: GatewayStats) -> Self {
        self.lookups = stats.requests;
        self.failed_attempts = stats.failed_attempts;
        self.abandoned_prefixes = stats.abandoned;
        self
    }

    /// Renders the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== Sweep Report ===\n");

    println!("Run:");
    println!("  Strategy: {}", report.strategy);
    println!("  Outcome: {}", report.outcome);
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    println!();

    println!("Discovery:");
    println!("  Names discovered: {}", report.names_discovered);
    println!("  Prefixes expanded: {}", report.prefixes_expanded);
    println!("  Prefixes queued: {}", report.prefixes_queued);
    println!("  Prefixes left in frontier: {}", report.frontier_remaining);
    println!();

    println!("Requests:");
    println!("  Lookups issued: {}", report.lookups);
    println!("  Failed attempts: {}", report.failed_attempts);
    println!("  Prefixes abandoned: {}", report.abandoned_prefixes);
    println!();

    println!("Persistence:");
    println!("  Snapshots written: {}", report.snapshots_written);
    if report.snapshot_failures > 0 {
        println!("  Snapshot failures: {}", report.snapshot_failures);
    }
}
