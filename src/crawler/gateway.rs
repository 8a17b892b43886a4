//! Retrying fetch gateway
//!
//! Wraps a [`Lookup`] so the crawl loop never sees a failure: each prefix
//! gets a bounded number of attempts with a fixed pause between them, and a
//! prefix that keeps failing is reported as having no completions.

use crate::crawler::fetcher::Lookup;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters describing gateway activity over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayStats {
    /// Lookup attempts issued, including retries
    pub requests: u64,
    /// Attempts that failed
    pub failed_attempts: u64,
    /// Prefixes given up on after the last attempt failed
    pub abandoned: u64,
}

/// Fetch gateway with bounded retry
pub struct FetchGateway<L> {
    lookup: L,
    max_attempts: u32,
    retry_delay: Duration,
    requests: AtomicU64,
    failed_attempts: AtomicU64,
    abandoned: AtomicU64,
}

impl<L: Lookup> FetchGateway<L> {
    /// Creates a gateway making at most `max_attempts` attempts per prefix
    pub fn new(lookup: L, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            lookup,
            max_attempts: max_attempts.max(1),
            retry_delay,
            requests: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            abandoned: AtomicU64::new(0),
        }
    }

    /// Fetches the completions for `prefix`
    ///
    /// Never fails: after the final attempt fails an empty list is returned.
    pub async fn fetch(&self, prefix: &str) -> Vec<String> {
        for attempt in 1..=self.max_attempts {
            let search = self.requests.fetch_add(1, Ordering::Relaxed) + 1;

            match self.lookup.lookup(prefix).await {
                Ok(results) => {
                    tracing::debug!(
                        "Search #{} for \"{}\" returned {} results",
                        search,
                        prefix,
                        results.len()
                    );
                    return results;
                }
                Err(e) => {
                    self.failed_attempts.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        "Lookup for \"{}\" failed (attempt {}/{}): {}",
                        prefix,
                        attempt,
                        self.max_attempts,
                        e
                    );
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        self.abandoned.fetch_add(1, Ordering::Relaxed);
        tracing::error!(
            "Giving up on \"{}\" after {} attempts, treating as empty",
            prefix,
            self.max_attempts
        );
        Vec::new()
    }

    /// Returns a snapshot of the gateway counters
    pub fn stats(&self) -> GatewayStats {
        GatewayStats {
            requests: self.requests.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }

    /// Returns the wrapped lookup
    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}
