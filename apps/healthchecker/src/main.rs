#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use healthchecker::Config;
use healthchecker::monitoring::{HttpChecker, MonitoringExecutor, MonitoringScheduler};
use healthchecker::notify::Notifier;
use logger::LogFormat;
use tracing::{info, level_filters::LevelFilter};

#[derive(Debug, Parser)]
#[command(version, about = "Periodically checks HTTP services and notifies on failures")]
struct Cli {
    /// Path to the configuration file (.yaml, .yml or .toml)
    config: PathBuf,

    /// Log output format, overrides RUST_LOG_FORMAT
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logger::init_with(LevelFilter::INFO, cli.log_format);

    let config = Config::from_path(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    info!("{config}");

    let checker = Arc::new(HttpChecker::new(config.timeout()).context("failed to create HTTP client")?);
    let notifier = Arc::new(Notifier::new(config.notify.clone(), checker.clone()));
    let executor = Arc::new(MonitoringExecutor::new(checker, notifier));
    let scheduler = MonitoringScheduler::new(executor, config.checks(), config.interval());

    let handle = scheduler.start();

    wait_for_shutdown_signal().await?;
    info!("Interrupt signal received.");

    handle.shutdown().await;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("failed to listen for Ctrl-C")?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")
}
