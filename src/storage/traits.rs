//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot sinks and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for snapshots of the discovered set
///
/// Each call replaces the previous snapshot in full; there is no append or
/// merge, and nothing is read back at startup.
pub trait SnapshotSink: Send {
    /// Discards any snapshot left by an earlier run
    fn reset(&mut self) -> StorageResult<()>;

    /// Persists the complete discovered set, in discovery order
    fn snapshot(&mut self, names: &[String]) -> StorageResult<()>;
}
