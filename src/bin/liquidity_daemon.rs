//! Liquidity coordinator daemon.
//!
//! Loads the configuration, registers the configured paper venues and runs
//! the periodic jobs until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use venue_liquidity::application::runtime::{simulated_registry, LiquidityRuntime};
use venue_liquidity::application::services::alerts::TracingAlertNotifier;
use venue_liquidity::config::AppConfig;
use venue_liquidity::telemetry::{init_logging, LogFormat};

/// Multi-venue liquidity coordinator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via VENUE_LIQUIDITY_CONFIG)
    #[arg(short, long, env = "VENUE_LIQUIDITY_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the configured log format
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Starts with automatic trading paused
    #[arg(long)]
    paused: bool,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    match value {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format: {other}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_logging(args.log_format.unwrap_or(config.logging.format))
        .context("installing tracing subscriber")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        "starting liquidity daemon"
    );

    let registry = simulated_registry(&config).context("building venue registry")?;
    let runtime = LiquidityRuntime::start(&config, registry, Arc::new(TracingAlertNotifier))
        .context("starting runtime")?;
    if args.paused {
        runtime.pause_automatic_trading("started paused");
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received");

    runtime.pause_automatic_trading("shutdown");
    runtime.shutdown().await;
    Ok(())
}
