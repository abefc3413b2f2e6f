//! Blocsummer Stats service library
//!
//! Scrapes the competition once a day, compares the day's ascents with the
//! day before, writes one chart per venue and hands the result to an
//! external publish hook.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod pipeline;
pub mod publish;
pub mod scheduler;

use anyhow::{Context, Result};
use blocsummer_config::Config;
use blocsummer_scraper::BoulderTopClient;

// Re-export commonly used types
pub use pipeline::{output_dir, Pipeline, RunReport};
pub use publish::{PublishHook, Publisher};
pub use scheduler::{DailyJob, DailySchedule};

/// Pipeline scraping the live site and running the configured hook.
pub type LivePipeline = Pipeline<BoulderTopClient, BoulderTopClient, PublishHook>;

/// Builds the production pipeline from `config`.
///
/// # Errors
///
/// Fails when the HTTP client cannot be created.
pub fn build_pipeline(config: Config) -> Result<LivePipeline> {
    let client = BoulderTopClient::new(config.competition.clone(), &config.http)
        .context("Failed to create boulder-top client")?;
    let publisher = PublishHook::from_config(&config.storage);
    Ok(Pipeline::new(config, client.clone(), client, publisher))
}
