#![doc = include_str!("../README.md")]

mod driver;

use clap::Parser;
use driver::config::{CliArgs, DemoConfig};
use driver::producer::{produce, timestamp_task};
use driver::telemetry::init_telemetry;
use portable_atomic::{AtomicU64, Ordering};
use relay_pool::Pool;
use std::sync::Arc;
use tokio::signal;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DemoConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let handle = Pool::with_config(config.pool).start();
    let stats = handle.stats();
    let submitted = Arc::new(AtomicU64::new(0));

    let producer = tokio::spawn(produce(
        handle.submitter(),
        timestamp_task(),
        config.clone(),
        submitted.clone(),
    ));

    let stop = handle.shutdown_token();
    tokio::spawn(async move {
        shutdown_signal().await;
        stop.cancel();
    });

    producer.await?;
    handle.wait().await?;

    let snap = stats.snapshot();
    tracing::info!(
        "Pool stopped: {} submitted, {} completed, {} failed, {} panicked (peak concurrency {})",
        submitted.load(Ordering::Relaxed),
        snap.completed,
        snap.failed,
        snap.panicked,
        snap.peak_in_flight
    );
    Ok(())
}

fn log_startup_info(config: &DemoConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting demo with full config: {:#?}", config);
    } else {
        tracing::info!("Starting demo with {} workers", config.pool.workers);
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
///
/// If a handler cannot be installed the error is logged and that source is
/// ignored.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }

    tracing::info!("Shutdown signal received, stopping pool...");
}
