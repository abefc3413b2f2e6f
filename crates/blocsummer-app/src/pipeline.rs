//! One daily run: snapshots, statistics, charts, publish.

use crate::publish::Publisher;
use crate::scheduler::DailyJob;
use anyhow::{Context, Result};
use async_trait::async_trait;
use blocsummer_common::{chart_file_name, date_stamp, snapshot_file_name};
use blocsummer_config::Config;
use blocsummer_graphs::{
    Aggregator, BitmapRenderer, ChartStyle, ComparisonRenderer, StatTable, VenueComparison,
};
use blocsummer_scraper::{AscentSource, ParticipantSource, SnapshotLoader, SnapshotStore};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Directory receiving the charts of `date`.
pub fn output_dir(output_root: &Path, date: NaiveDate) -> PathBuf {
    output_root.join(date_stamp(date))
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Competition day the run was for.
    pub date: NaiveDate,
    /// Dated output directory.
    pub output_dir: PathBuf,
    /// Copy of today's snapshot inside the output directory.
    pub snapshot_copy: PathBuf,
    /// One chart per venue, in venue order.
    pub charts: Vec<PathBuf>,
    /// Whether today's snapshot was scraped in this run.
    pub fetched: bool,
    /// Whether the charts compare today against itself.
    pub baseline_fallback: bool,
}

/// Wires the sources, the snapshot store, the renderer and the publisher.
pub struct Pipeline<P, A, B, R = BitmapRenderer> {
    config: Config,
    participants: P,
    ascents: A,
    publisher: B,
    renderer: R,
}

impl<P, A, B> Pipeline<P, A, B> {
    /// A pipeline writing PNG charts.
    pub const fn new(config: Config, participants: P, ascents: A, publisher: B) -> Self {
        Self {
            config,
            participants,
            ascents,
            publisher,
            renderer: BitmapRenderer,
        }
    }
}

impl<P, A, B, R> Pipeline<P, A, B, R> {
    /// Replaces the chart renderer.
    pub fn with_renderer<T>(self, renderer: T) -> Pipeline<P, A, B, T> {
        Pipeline {
            config: self.config,
            participants: self.participants,
            ascents: self.ascents,
            publisher: self.publisher,
            renderer,
        }
    }
}

impl<P, A, B, R> Pipeline<P, A, B, R>
where
    P: ParticipantSource,
    A: AscentSource,
    B: Publisher,
    R: ComparisonRenderer + Clone,
{
    /// Runs the whole pipeline for `date`.
    ///
    /// # Errors
    ///
    /// Any fetch, parse, filesystem or drawing failure aborts the run before
    /// the publish hook is invoked.
    #[instrument(skip(self))]
    pub async fn run_for(&self, date: NaiveDate) -> Result<RunReport> {
        let storage = &self.config.storage;
        let store = SnapshotStore::new(&storage.data_dir);
        let loaded = SnapshotLoader::new(&self.participants, &self.ascents, &store)
            .load(date)
            .await
            .with_context(|| format!("Failed to load snapshots for {date}"))?;

        let aggregator = Aggregator::new(&self.config.competition);
        let today = aggregator.aggregate(&loaded.today);
        let yesterday = aggregator.aggregate(&loaded.yesterday);

        let output_dir = output_dir(&storage.output_root, date);
        tokio::fs::create_dir_all(&output_dir)
            .await
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let snapshot_copy = output_dir.join(snapshot_file_name(date));
        tokio::fs::copy(&loaded.today_path, &snapshot_copy)
            .await
            .with_context(|| format!("Failed to copy snapshot to {}", snapshot_copy.display()))?;

        let style = ChartStyle::from_config(&self.config.graphs);
        let empty = StatTable::new(self.config.competition.boulder_count);
        let mut charts = Vec::with_capacity(self.config.competition.venues.len());

        for spec in &self.config.competition.venues {
            let venue = spec.venue;
            let comparison = VenueComparison::build(
                venue,
                today.get(&venue).unwrap_or(&empty),
                yesterday.get(&venue).unwrap_or(&empty),
            );
            let path = output_dir.join(chart_file_name(date, venue));

            let style = style.clone();
            let target = path.clone();
            let renderer = self.renderer.clone();
            tokio::task::spawn_blocking(move || renderer.render(&comparison, &style, &target))
                .await
                .context("Chart rendering task panicked")?
                .with_context(|| format!("Failed to render {}", path.display()))?;

            charts.push(path);
        }

        self.publisher.publish(&output_dir).await;

        info!(
            "Run for {} wrote {} charts to {}",
            date,
            charts.len(),
            output_dir.display()
        );

        Ok(RunReport {
            date,
            output_dir,
            snapshot_copy,
            charts,
            fetched: loaded.fetched,
            baseline_fallback: loaded.baseline_fallback,
        })
    }
}

#[async_trait]
impl<P, A, B, R> DailyJob for Pipeline<P, A, B, R>
where
    P: ParticipantSource,
    A: AscentSource,
    B: Publisher,
    R: ComparisonRenderer + Clone,
{
    async fn run(&self, date: NaiveDate) -> Result<()> {
        self.run_for(date).await.map(|_| ())
    }
}
