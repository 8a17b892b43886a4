//! Frontier queue of prefixes awaiting expansion
//!
//! The frontier itself is a plain FIFO. Whether a prefix may be pushed is
//! decided by the strategy's [`ExpansionPolicy`](crate::crawler::ExpansionPolicy)
//! against the dedup index before it reaches the queue.

use std::collections::VecDeque;

/// FIFO work queue of prefixes
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    pushed: u64,
}

impl Frontier {
    /// Creates a frontier holding the given seed prefixes, in order
    pub fn seeded<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frontier = Self::default();
        for seed in seeds {
            frontier.push(seed);
        }
        frontier
    }

    /// Appends a prefix to the back of the queue
    pub fn push(&mut self, prefix: impl Into<String>) {
        self.queue.push_back(prefix.into());
        self.pushed += 1;
    }

    /// Removes the next prefix to expand
    pub fn pop_next(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Removes up to `max` prefixes from the front of the queue
    pub fn pop_batch(&mut self, max: usize) -> Vec<String> {
        let take = max.min(self.queue.len());
        self.queue.drain(..take).collect()
    }

    /// Returns the number of prefixes waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total number of pushes over the frontier's lifetime, seeds included
    pub fn total_pushed(&self) -> u64 {
        self.pushed
    }

    /// Iterates over the waiting prefixes, front first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}
