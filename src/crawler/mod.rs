//! Crawler module for prefix expansion
//!
//! This module contains the core sweep logic, including:
//! - HTTP lookups against the autocomplete endpoint
//! - Bounded retry of failed lookups
//! - The frontier queue and strategy admission policies
//! - Exhaustion detection
//! - Overall sweep coordination

mod coordinator;
mod exhaustion;
mod fetcher;
mod frontier;
mod gateway;
mod policy;

pub use coordinator::{run_sweep, Coordinator, CrawlOutcome};
pub use exhaustion::ExhaustionMonitor;
pub use fetcher::{build_http_client, endpoint_url, HttpLookup, Lookup};
pub use frontier::Frontier;
pub use gateway::{FetchGateway, GatewayStats};
pub use policy::{
    policy_for, split_prefixes, BreadthFirst, Expansion, ExpansionPolicy, SplitPoint, TriePruned,
};

use crate::config::Config;
use crate::output::RunReport;
use crate::SweepError;
use tokio_util::sync::CancellationToken;

/// Runs a complete sweep, stopping cleanly on Ctrl-C or SIGTERM
///
/// This is the main entry point for starting a sweep. It will:
/// 1. Build the HTTP lookup and snapshot sink
/// 2. Seed the frontier
/// 3. Expand prefixes with the configured strategy
/// 4. Save a final snapshot if interrupted
pub async fn sweep(config: Config) -> Result<RunReport, SweepError> {
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    let signals = tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    let result = run_sweep(config, cancel).await;
    signals.abort();
    result
}

/// Resolves when the process is asked to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received SIGINT, stopping sweep"),
        _ = terminate => tracing::warn!("Received SIGTERM, stopping sweep"),
    }
}
