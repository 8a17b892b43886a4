//! Crawler coordinator - main sweep orchestration logic
//!
//! This module contains the main loop that coordinates a run:
//! - Seeding the frontier
//! - Fetching one prefix (or one batch) per step through the gateway
//! - Applying the strategy's expansion policy to the results
//! - Exhaustion detection and rate-limit pacing
//! - Snapshotting progress and handling interruption

use crate::config::{validate, Config, CrawlerConfig, StrategyKind};
use crate::crawler::exhaustion::ExhaustionMonitor;
use crate::crawler::fetcher::{HttpLookup, Lookup};
use crate::crawler::frontier::Frontier;
use crate::crawler::gateway::FetchGateway;
use crate::crawler::policy::{policy_for, ExpansionPolicy};
use crate::index::DedupIndex;
use crate::output::RunReport;
use crate::storage::{JsonFileSink, SnapshotSink};
use crate::SweepError;
use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlOutcome {
    /// The frontier ran out of prefixes
    Drained,
    /// Too many consecutive expansions produced nothing new
    Exhausted,
    /// Cancellation was requested
    Interrupted,
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CrawlOutcome::Drained => "drained",
            CrawlOutcome::Exhausted => "exhausted",
            CrawlOutcome::Interrupted => "interrupted",
        };
        f.write_str(s)
    }
}

/// Main sweep coordinator
///
/// Owns every piece of per-run state. All mutation happens on the task
/// driving [`Coordinator::run`]; hybrid batches are fetched concurrently but
/// applied only after the whole batch has returned.
pub struct Coordinator<L, S> {
    config: CrawlerConfig,
    gateway: FetchGateway<L>,
    sink: S,
    policy: Box<dyn ExpansionPolicy>,
    index: DedupIndex,
    frontier: Frontier,
    monitor: ExhaustionMonitor,
    cancel: CancellationToken,
    prefixes_expanded: u64,
    snapshots_written: u64,
    snapshot_failures: u64,
    persisted_len: usize,
}

impl<L: Lookup, S: SnapshotSink> Coordinator<L, S> {
    /// Creates a coordinator in the seeded state
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `lookup` - The autocomplete lookup to query
    /// * `sink` - Where snapshots of the discovered set are written
    pub fn new(config: CrawlerConfig, lookup: L, sink: S) -> Self {
        let gateway = FetchGateway::new(lookup, config.max_retries, config.retry_delay());
        let policy = policy_for(&config);

        let mut index = DedupIndex::new();
        let mut frontier = Frontier::default();
        for seed in config.seeds.iter().filter(|s| !s.is_empty()) {
            if index.mark_enqueued(seed) {
                frontier.push(seed.as_str());
            }
        }

        Self {
            monitor: ExhaustionMonitor::new(config.max_empty_responses),
            config,
            gateway,
            sink,
            policy,
            index,
            frontier,
            cancel: CancellationToken::new(),
            prefixes_expanded: 0,
            snapshots_written: 0,
            snapshot_failures: 0,
            persisted_len: 0,
        }
    }

    /// Uses `cancel` to stop the run from outside
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a token that interrupts this run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The dedup index, holding the discovered set
    pub fn index(&self) -> &DedupIndex {
        &self.index
    }

    /// Prefixes still waiting for expansion
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// The strategy being run
    pub fn strategy(&self) -> StrategyKind {
        self.policy.kind()
    }

    /// Runs the main sweep loop until drained, exhausted or interrupted
    ///
    /// Never fails: lookup failures degrade to empty results and snapshot
    /// failures are logged and counted.
    pub async fn run(&mut self) -> RunReport {
        let started_at = Utc::now();
        let strategy = self.strategy();
        let batch_size = self.policy.batch_size();
        let pause = self.pause();

        tracing::info!(
            "Starting {} strategy with {} seed prefixes (batch size {}, {:?} between steps)",
            strategy,
            self.frontier.len(),
            batch_size,
            pause
        );

        // Every run starts from an empty discovered set
        if let Err(e) = self.sink.reset() {
            tracing::error!("Failed to clear previous snapshot: {}", e);
        }

        let outcome = loop {
            if self.cancel.is_cancelled() {
                break CrawlOutcome::Interrupted;
            }

            let batch = self.frontier.pop_batch(batch_size);
            if batch.is_empty() {
                tracing::info!("Frontier is empty, sweep complete");
                break CrawlOutcome::Drained;
            }

            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                fetched = join_all(batch.iter().map(|prefix| self.gateway.fetch(prefix))) => Some(fetched),
            };
            let Some(fetched) = fetched else {
                break CrawlOutcome::Interrupted;
            };

            self.apply_step(&batch, &fetched);

            if self.monitor.should_halt() {
                tracing::warn!(
                    "API exhaustion detected! Stopping after {} empty responses.",
                    self.monitor.streak()
                );
                break CrawlOutcome::Exhausted;
            }

            if !self.frontier.is_empty() && self.sleep_or_cancel(pause).await {
                break CrawlOutcome::Interrupted;
            }
        };

        if outcome == CrawlOutcome::Interrupted {
            tracing::warn!("Interrupt received, saving progress before exit");
            self.persist();
        } else if self.index.len() > self.persisted_len {
            // An earlier snapshot failed; try once more with everything we have.
            self.persist();
        }

        tracing::info!(
            "{} strategy finished ({}). Found {} names.",
            strategy,
            outcome,
            self.index.len()
        );

        RunReport {
            strategy,
            outcome,
            names_discovered: self.index.len(),
            prefixes_expanded: self.prefixes_expanded,
            frontier_remaining: self.frontier.len(),
            prefixes_queued: self.frontier.total_pushed(),
            lookups: 0,
            failed_attempts: 0,
            abandoned_prefixes: 0,
            snapshots_written: self.snapshots_written,
            snapshot_failures: self.snapshot_failures,
            started_at,
            finished_at: Utc::now(),
        }
        .with_gateway_stats(self.gateway.stats())
    }

    /// Applies one step's lookup results to the index, frontier and monitor
    fn apply_step(&mut self, batch: &[String], fetched: &[Vec<String>]) {
        let mut new_in_step = 0;

        for (prefix, results) in batch.iter().zip(fetched) {
            self.prefixes_expanded += 1;
            let expansion =
                self.policy
                    .admit_and_expand(prefix, results, &mut self.index, &mut self.frontier);
            new_in_step += expansion.new_names;

            tracing::info!(
                "Fetched {} results for prefix \"{}\" ({} new, {} queued)",
                results.len(),
                prefix,
                expansion.new_names,
                expansion.pushed
            );
        }

        if new_in_step > 0 {
            self.monitor.record_productive();
            self.persist();
        } else {
            self.monitor.record_empty();
            tracing::warn!(
                "No new results for {}. Empty count: {}",
                describe_step(batch),
                self.monitor.streak()
            );
        }

        tracing::debug!(
            "Discovered {} names, {} prefixes in frontier",
            self.index.len(),
            self.frontier.len()
        );
    }

    /// Writes a full snapshot, logging instead of failing
    fn persist(&mut self) {
        match self.sink.snapshot(self.index.names()) {
            Ok(()) => {
                self.snapshots_written += 1;
                self.persisted_len = self.index.len();
            }
            Err(e) => {
                self.snapshot_failures += 1;
                tracing::error!(
                    "Failed to save snapshot of {} names: {}",
                    self.index.len(),
                    e
                );
            }
        }
    }

    /// Delay between steps: the per-request interval times the batch width
    fn pause(&self) -> Duration {
        let width = u32::try_from(self.policy.batch_size()).unwrap_or(u32::MAX);
        self.config.interval().saturating_mul(width)
    }

    /// Sleeps for `pause`, returning `true` if cancelled first
    async fn sleep_or_cancel(&self, pause: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => true,
            _ = tokio::time::sleep(pause) => false,
        }
    }
}

fn describe_step(batch: &[String]) -> String {
    match batch {
        [prefix] => format!("prefix \"{}\"", prefix),
        _ => format!("batch of {} prefixes", batch.len()),
    }
}

/// Runs a complete sweep from configuration
///
/// Validates `config`, builds the HTTP lookup and the JSON snapshot sink,
/// then drives a [`Coordinator`] until it finishes or `cancel` fires.
///
/// # Example
///
/// ```no_run
/// use prefix_sweep::config::load_config;
/// use prefix_sweep::crawler::run_sweep;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sweep.toml"))?;
/// let report = run_sweep(config, CancellationToken::new()).await?;
/// println!("{} names", report.names_discovered);
/// # Ok(())
/// # }
/// ```
pub async fn run_sweep(config: Config, cancel: CancellationToken) -> Result<RunReport, SweepError> {
    validate(&config)?;
    let lookup = HttpLookup::from_config(&config.api, &config.crawler)?;
    let sink = JsonFileSink::new(Path::new(&config.output.names_path));

    let mut coordinator = Coordinator::new(config.crawler, lookup, sink).with_cancellation(cancel);
    Ok(coordinator.run().await)
}
