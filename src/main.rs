//! pinharvest - full-resolution image addresses from an image board.
//!
//! Main entry point for the pinharvest CLI.

mod cli;
mod harvest;

use std::path::Path;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pinharvest_config::{ConfigLoader, ConfigValidator};

use cli::Cli;

/// Initialize tracing with console and file output.
///
/// Log files are written to `log_dir` with daily rotation. `RUST_LOG`
/// overrides `level`.
fn init_tracing(log_dir: &Path, level: &str) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pinharvest")
        .filename_suffix("log")
        .max_log_files(30)
        .build(log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Console goes to stderr; stdout carries the result lines.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_or_default(&cli.config)?;
    cli.apply(&mut config);

    init_tracing(&config.logging.dir(), &config.logging.level)?;
    info!("Starting pinharvest v{}", env!("CARGO_PKG_VERSION"));

    for warning in ConfigValidator::validate(&config)?.into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; finishing the current entry and marking the rest cancelled");
                cancel.cancel();
            }
        });
    }

    match harvest::run(&config, cli.range(), &cancel).await {
        Ok(summary) => {
            info!(
                "Done: {} resolved, {} failed, {} cancelled",
                summary.resolved, summary.failed, summary.cancelled
            );
            Ok(())
        }
        Err(e) => {
            error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
