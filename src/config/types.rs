use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure for Prefix-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub api: ApiConfig,
    pub output: OutputConfig,
}

/// Traversal strategy used to expand the namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyKind {
    /// Sequential breadth-first expansion of every new name
    Bfs,
    /// Breadth-first expansion gated by the dedup trie
    Trie,
    /// Trie-gated expansion with concurrently fetched batches
    Hybrid,
    /// Split-point expansion around the midpoint of each new name
    BinarySearch,
}

impl StrategyKind {
    /// Returns the configuration name of this strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Bfs => "bfs",
            StrategyKind::Trie => "trie",
            StrategyKind::Hybrid => "hybrid",
            StrategyKind::BinarySearch => "binarysearch",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(StrategyKind::Bfs),
            "trie" => Ok(StrategyKind::Trie),
            "hybrid" => Ok(StrategyKind::Hybrid),
            "binarysearch" | "split-point" => Ok(StrategyKind::BinarySearch),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrategyKind> for String {
    fn from(kind: StrategyKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Traversal strategy
    pub strategy: StrategyKind,

    /// Request budget in requests per minute
    #[serde(rename = "rate-limit")]
    pub rate_limit: u32,

    /// Total lookup attempts per prefix before giving up
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause between failed attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Consecutive non-productive expansions before the run halts
    #[serde(rename = "max-empty-responses")]
    pub max_empty_responses: u32,

    /// Prefixes fetched concurrently by the hybrid strategy
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Re-enqueue every returned name in the plain BFS strategy, even when
    /// it was already discovered
    #[serde(rename = "requeue-duplicates")]
    pub requeue_duplicates: bool,

    /// Initial frontier
    pub seeds: Vec<String>,
}

impl CrawlerConfig {
    /// Minimum spacing between the start of successive lookups
    pub fn interval(&self) -> Duration {
        Duration::from_millis(60_000 / u64::from(self.rate_limit.max(1)))
    }

    /// Pause between retry attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Timeout applied to each HTTP lookup
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Bfs,
            rate_limit: 100,
            max_retries: 3,
            retry_delay_ms: 1000,
            max_empty_responses: 10,
            batch_size: 5,
            request_timeout_ms: 10_000,
            requeue_duplicates: false,
            seeds: default_seeds(),
        }
    }
}

/// The 26 single-letter prefixes `a`..`z`
pub fn default_seeds() -> Vec<String> {
    ('a'..='z').map(|c| c.to_string()).collect()
}

/// Remote autocomplete endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme, host and port of the service
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the autocomplete endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// User-Agent header sent with each lookup
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "/v1/autocomplete".to_string()
}

fn default_user_agent() -> String {
    format!("prefix-sweep/{}", env!("CARGO_PKG_VERSION"))
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON snapshot of discovered names
    #[serde(rename = "names-path")]
    pub names_path: String,
}
