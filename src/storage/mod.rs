//! Storage module for persisting crawl progress
//!
//! This module handles durable snapshots of the discovered set:
//! - the [`SnapshotSink`] interface used by the coordinator
//! - a JSON file implementation with atomic replacement

mod json;
mod traits;

pub use json::{read_snapshot, JsonFileSink};
pub use traits::{SnapshotSink, StorageError, StorageResult};
