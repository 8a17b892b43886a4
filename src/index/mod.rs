//! Dedup index for discovered names and enqueued prefixes
//!
//! The index is the single source of truth for "have we seen this before?"
//! during a run:
//!
//! - admitted names live in a [`PrefixTrie`] (exact and prefix queries) and in
//!   a discovery-ordered list used for snapshots
//! - every prefix ever pushed onto the frontier is recorded separately, so a
//!   strategy can refuse to enqueue the same prefix twice

mod trie;

pub use trie::PrefixTrie;

use std::collections::HashSet;

/// Membership structure over discovered names and enqueued prefixes
#[derive(Debug, Default)]
pub struct DedupIndex {
    trie: PrefixTrie,
    names: Vec<String>,
    enqueued: HashSet<String>,
}

impl DedupIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a name into the discovered set
    ///
    /// Returns `true` iff the name was not previously admitted.
    pub fn admit(&mut self, name: &str) -> bool {
        if !self.trie.insert(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Returns `true` if exactly `name` has been admitted
    pub fn contains(&self, name: &str) -> bool {
        self.trie.contains(name)
    }

    /// Returns `true` if some admitted name begins with or equals `prefix`
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.trie.contains_prefix(prefix)
    }

    /// Records a prefix as enqueued
    ///
    /// Returns `true` iff the prefix had never been enqueued in this run.
    pub fn mark_enqueued(&mut self, prefix: &str) -> bool {
        if self.enqueued.contains(prefix) {
            return false;
        }
        self.enqueued.insert(prefix.to_string())
    }

    /// Admitted names in discovery order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of admitted names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
