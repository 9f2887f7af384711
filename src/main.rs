//! Domain-Scout main entry point
//!
//! This is the command-line interface for the Domain-Scout access point tracker.

use anyhow::Context;
use clap::Parser;
use domain_scout::config::{load_config_with_hash, Config};
use domain_scout::crawler::{Coordinator, Scheduler};
use domain_scout::server;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Domain-Scout: tracks the current access domain of a mirrored service
///
/// Domain-Scout scrapes an aggregator page for announced access URLs, caches
/// what it finds for a day, refreshes on a schedule, and serves the current
/// domain over HTTP.
#[derive(Parser, Debug)]
#[command(name = "domain-scout")]
#[command(version)]
#[command(about = "Tracks the current access domain of a mirrored service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would run without starting anything
    #[arg(long, conflicts_with_all = ["refresh_once", "show"])]
    dry_run: bool,

    /// Scrape the source once, store the result, print it and exit
    #[arg(long, conflicts_with_all = ["dry_run", "show"])]
    refresh_once: bool,

    /// Print the current access point and exit
    #[arg(long, conflicts_with_all = ["dry_run", "refresh_once"])]
    show: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let coordinator = Arc::new(
        Coordinator::from_config(&config).context("Failed to initialize coordinator")?,
    );

    if cli.refresh_once {
        handle_refresh_once(&coordinator).await
    } else if cli.show {
        handle_show(&coordinator).await
    } else {
        handle_serve(&config, coordinator).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("domain_scout=info,warn"),
            1 => EnvFilter::new("domain_scout=debug,tower_http=debug,info"),
            2 => EnvFilter::new("domain_scout=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Domain-Scout Dry Run ===\n");

    println!("Source:");
    println!("  URL: {}", config.source.url);
    println!("  Timeout: {}s", config.source.timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    let rules = &config.extraction;
    println!("\nExtraction:");
    println!("  Marker: {}", rules.marker);
    println!("  Emphasis tags: {}", rules.emphasis_tags.join(", "));
    println!("  Label style: {}", rules.label_style);
    println!("  Label keywords: {}", rules.label_keywords.join(", "));

    println!("\nStore:");
    println!("  Backend: {:?}", config.store.backend);
    if let Some(path) = &config.store.path {
        println!("  Path: {}", path);
    }
    println!("  Cache key: {}", config.store.cache_key);
    println!("  TTL: {}s", config.store.ttl_secs);
    if let Some(path) = &config.store.fallback_path {
        println!("  Fallback file: {}", path);
    }

    println!("\nSchedule:");
    println!("  Cron: {} (local time)", config.schedule.cron);
    println!("  Refresh on start: {}", config.schedule.run_on_start);

    println!("\nServer:");
    println!("  Bind: {}", config.server.bind);

    println!("\n✓ Configuration is valid");
}

/// Handles the --refresh-once mode: one forced scrape, printed as JSON
async fn handle_refresh_once(coordinator: &Coordinator) -> anyhow::Result<()> {
    let snapshot = coordinator
        .refresh()
        .await
        .with_context(|| format!("Refresh of {} failed", coordinator.source_url()))?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Handles the --show mode: the same answer the API would give
async fn handle_show(coordinator: &Coordinator) -> anyhow::Result<()> {
    let current = coordinator.current_access_point().await;
    println!("{}", serde_json::to_string_pretty(&current)?);
    Ok(())
}

/// Handles the default mode: scheduler plus HTTP API until Ctrl-C
async fn handle_serve(config: &Config, coordinator: Arc<Coordinator>) -> anyhow::Result<()> {
    let bind: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;

    let mut scheduler = Scheduler::new(coordinator.clone(), config.schedule.clone());
    scheduler
        .start()
        .await
        .context("Failed to start refresh scheduler")?;

    let result = server::serve(bind, coordinator, shutdown_signal()).await;

    scheduler.shutdown().await?;
    result.context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
