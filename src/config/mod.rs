//! Configuration module for Prefix-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use prefix_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Strategy: {}", config.crawler.strategy);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{default_seeds, ApiConfig, Config, CrawlerConfig, OutputConfig, StrategyKind};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
