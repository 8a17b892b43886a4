//! Admission-and-expansion policies for the four traversal strategies
//!
//! Every strategy shares the same index, frontier and loop; they differ only
//! in which prefixes a lookup result puts back on the frontier and in how many
//! prefixes are fetched per step.
//!
//! | Strategy       | Pushed after a lookup                                  | Batch |
//! |----------------|--------------------------------------------------------|-------|
//! | `bfs`          | every new name (every name with `requeue-duplicates`)  | 1     |
//! | `trie`         | every new name never enqueued before                   | 1     |
//! | `hybrid`       | same as `trie`                                         | N     |
//! | `binarysearch` | `name[..mid]` and `name[..mid + 1]` of each new name   | 1     |

use crate::config::{CrawlerConfig, StrategyKind};
use crate::crawler::frontier::Frontier;
use crate::index::DedupIndex;

/// Result of applying a policy to one lookup response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Names admitted for the first time
    pub new_names: usize,
    /// Prefixes pushed onto the frontier
    pub pushed: usize,
}

/// Strategy-specific admission rule
pub trait ExpansionPolicy: Send + Sync {
    /// The strategy this policy implements
    fn kind(&self) -> StrategyKind;

    /// Number of prefixes fetched per step
    fn batch_size(&self) -> usize {
        1
    }

    /// Admits the names returned for `prefix` and pushes follow-up prefixes
    fn admit_and_expand(
        &self,
        prefix: &str,
        results: &[String],
        index: &mut DedupIndex,
        frontier: &mut Frontier,
    ) -> Expansion;
}

/// Builds the policy for the configured strategy
pub fn policy_for(config: &CrawlerConfig) -> Box<dyn ExpansionPolicy> {
    match config.strategy {
        StrategyKind::Bfs => Box::new(BreadthFirst {
            requeue_duplicates: config.requeue_duplicates,
        }),
        StrategyKind::Trie => Box::new(TriePruned::sequential()),
        StrategyKind::Hybrid => Box::new(TriePruned::batched(config.batch_size)),
        StrategyKind::BinarySearch => Box::new(SplitPoint),
    }
}

/// Plain breadth-first expansion
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst {
    /// Push names that were already discovered as well
    pub requeue_duplicates: bool,
}

impl ExpansionPolicy for BreadthFirst {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Bfs
    }

    fn admit_and_expand(
        &self,
        _prefix: &str,
        results: &[String],
        index: &mut DedupIndex,
        frontier: &mut Frontier,
    ) -> Expansion {
        let mut expansion = Expansion::default();

        for name in results.iter().filter(|n| !n.is_empty()) {
            let is_new = index.admit(name);
            if is_new {
                expansion.new_names += 1;
            }
            if is_new || self.requeue_duplicates {
                index.mark_enqueued(name);
                frontier.push(name.as_str());
                expansion.pushed += 1;
            }
        }

        expansion
    }
}

/// Breadth-first expansion gated by the dedup index
///
/// Used by both the `trie` strategy (batch of one) and the `hybrid` strategy.
#[derive(Debug, Clone, Copy)]
pub struct TriePruned {
    kind: StrategyKind,
    batch_size: usize,
}

impl TriePruned {
    /// One prefix per step (`trie`)
    pub fn sequential() -> Self {
        Self {
            kind: StrategyKind::Trie,
            batch_size: 1,
        }
    }

    /// Up to `batch_size` concurrently fetched prefixes per step (`hybrid`)
    pub fn batched(batch_size: usize) -> Self {
        Self {
            kind: StrategyKind::Hybrid,
            batch_size: batch_size.max(1),
        }
    }
}

impl ExpansionPolicy for TriePruned {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn admit_and_expand(
        &self,
        _prefix: &str,
        results: &[String],
        index: &mut DedupIndex,
        frontier: &mut Frontier,
    ) -> Expansion {
        let mut expansion = Expansion::default();

        for name in results.iter().filter(|n| !n.is_empty()) {
            if !index.admit(name) {
                continue;
            }
            expansion.new_names += 1;

            if index.mark_enqueued(name) {
                frontier.push(name.as_str());
                expansion.pushed += 1;
            }
        }

        expansion
    }
}

/// Split-point expansion
///
/// A heuristic, not a search over a sorted namespace: each new name is
/// cut at its midpoint and the two surrounding prefixes are queried to surface
/// sibling completions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitPoint;

impl ExpansionPolicy for SplitPoint {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BinarySearch
    }

    fn admit_and_expand(
        &self,
        _prefix: &str,
        results: &[String],
        index: &mut DedupIndex,
        frontier: &mut Frontier,
    ) -> Expansion {
        let mut expansion = Expansion::default();

        for name in results.iter().filter(|n| !n.is_empty()) {
            if !index.admit(name) {
                continue;
            }
            expansion.new_names += 1;

            let (left, right) = split_prefixes(name);
            for derived in [left, right] {
                if derived.is_empty() || index.contains(derived) {
                    continue;
                }
                if index.mark_enqueued(derived) {
                    frontier.push(derived);
                    expansion.pushed += 1;
                }
            }
        }

        expansion
    }
}

/// Returns `(name[..mid], name[..mid + 1])` with `mid = len / 2`, in chars
pub fn split_prefixes(name: &str) -> (&str, &str) {
    let len = name.chars().count();
    let mid = len / 2;
    (char_prefix(name, mid), char_prefix(name, mid + 1))
}

fn char_prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}
