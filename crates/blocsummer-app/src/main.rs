//! Blocsummer Stats - Main Entry Point

use anyhow::{Context, Result};
use blocsummer_app::{build_pipeline, DailySchedule};
use blocsummer_common::{init_logging, with_bootstrap_logging};
use blocsummer_config::ConfigLoader;
use chrono::{Local, NaiveDateTime};
use tracing::{error, info};

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Completes on Ctrl-C. Never completes if the signal cannot be watched.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = with_bootstrap_logging(ConfigLoader::load).context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting Blocsummer Stats {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Snapshots in {}, charts under {}",
        config.storage.data_dir.display(),
        config.storage.output_root.display()
    );

    let scheduling = config.scheduling.clone();
    let pipeline = build_pipeline(config)?;
    let mut schedule = DailySchedule::from_config(&scheduling, local_now())?;

    if scheduling.run_on_startup {
        schedule.run_job(&pipeline, local_now(), local_now).await;
    }
    info!("Next run at {}", schedule.next_run());

    schedule
        .run_until(&pipeline, local_now, shutdown_signal())
        .await;

    info!("Blocsummer Stats has shut down");
    Ok(())
}
