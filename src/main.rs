//! Prefix-Sweep main entry point
//!
//! This is the command-line interface for the Prefix-Sweep namespace extractor.

use anyhow::Context;
use clap::Parser;
use prefix_sweep::config::{load_config_with_hash, validate, Config, StrategyKind};
use prefix_sweep::crawler::{endpoint_url, sweep};
use prefix_sweep::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Prefix-Sweep: an autocomplete namespace extractor
///
/// Prefix-Sweep queries an autocomplete endpoint with short prefixes, feeds
/// the completions back in as new prefixes, and records every distinct name
/// it finds while staying within the request budget.
#[derive(Parser, Debug)]
#[command(name = "prefix-sweep")]
#[command(version)]
#[command(about = "An autocomplete namespace extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the configured strategy (bfs, trie, hybrid, binarysearch)
    #[arg(short, long)]
    strategy: Option<String>,

    /// Override the snapshot path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be swept without sending requests
    #[arg(long)]
    dry_run: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = sweep(config).await?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("prefix_sweep=info,warn"),
            1 => EnvFilter::new("prefix_sweep=debug,info"),
            2 => EnvFilter::new("prefix_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides and re-validates the result
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(strategy) = &cli.strategy {
        config.crawler.strategy = strategy.parse::<StrategyKind>()?;
    }

    if let Some(output) = &cli.output {
        config.output.names_path = output.display().to_string();
    }

    validate(config)?;
    Ok(())
}

/// Handles the --dry-run mode: shows the plan without sending requests
fn handle_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Prefix-Sweep Dry Run ===\n");

    println!("Strategy: {}", crawler.strategy);
    if crawler.strategy == StrategyKind::Hybrid {
        println!("  Batch size: {}", crawler.batch_size);
    }
    if crawler.strategy == StrategyKind::Bfs {
        println!("  Re-queue duplicates: {}", crawler.requeue_duplicates);
    }

    println!("\nLimits:");
    println!(
        "  Rate limit: {} requests/minute ({:?} between requests)",
        crawler.rate_limit,
        crawler.interval()
    );
    println!(
        "  Attempts per prefix: {} ({}ms apart)",
        crawler.max_retries, crawler.retry_delay_ms
    );
    println!("  Request timeout: {}ms", crawler.request_timeout_ms);
    println!(
        "  Stop after {} consecutive empty responses",
        crawler.max_empty_responses
    );

    println!("\nEndpoint:");
    match endpoint_url(&config.api) {
        Ok(url) => println!("  {}", url),
        Err(e) => println!("  {}{} (invalid: {})", config.api.base_url, config.api.endpoint, e),
    }
    println!("  User agent: {}", config.api.user_agent);

    println!("\nOutput:");
    println!("  Names: {}", config.output.names_path);

    println!("\nSeeds ({}):", crawler.seeds.len());
    println!("  {}", crawler.seeds.join(" "));

    println!("\n✓ Configuration is valid");
}
