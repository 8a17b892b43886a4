//! Prefix-Sweep: an autocomplete namespace extractor
//!
//! This crate discovers the set of names reachable from a remote autocomplete
//! service by recursively expanding prefixes, under a strict request budget.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Prefix-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown strategy '{0}' (expected one of: bfs, trie, hybrid, binarysearch)")]
    UnknownStrategy(String),
}

/// Errors raised by a single autocomplete lookup attempt
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error for query '{query}': {source}")]
    Http {
        query: String,
        source: reqwest::Error,
    },

    #[error("Request timeout for query '{query}'")]
    Timeout { query: String },

    #[error("Unexpected status {status} for query '{query}'")]
    Status { query: String, status: u16 },

    #[error("Failed to decode response for query '{query}': {message}")]
    Decode { query: String, message: String },

    #[error("Invalid lookup URL: {0}")]
    Url(#[from] ::url::ParseError),
}

/// Result type alias for Prefix-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for lookup operations
pub type LookupResult<T> = std::result::Result<T, LookupError>;

// Re-export commonly used types
pub use config::{Config, StrategyKind};
pub use crawler::{Coordinator, CrawlOutcome};
pub use index::DedupIndex;
pub use output::RunReport;
