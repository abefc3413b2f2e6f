//! End-to-end tests for the daily pipeline.

use async_trait::async_trait;
use blocsummer_app::{DailyJob, DailySchedule, Pipeline, Publisher};
use blocsummer_common::test_utils::{create_temp_dir, snapshot_fixtures};
use blocsummer_common::{AscentRecord, BlocError, Category, ParticipantId, Result, Venue};
use blocsummer_config::Config;
use blocsummer_graphs::{ChartStyle, ComparisonRenderer, VenueComparison};
use blocsummer_scraper::{AscentSource, ParticipantSource, SnapshotStore};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default, Clone)]
struct CountingSource {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ParticipantSource for CountingSource {
    async fn participants(&self, category: Category) -> Result<Vec<ParticipantId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match category {
            Category::Male => vec![ParticipantId::from("1001")],
            Category::Female => vec![ParticipantId::from("2001")],
        })
    }
}

#[async_trait]
impl AscentSource for CountingSource {
    async fn ascents(&self, participant: &ParticipantId, _category: Category) -> Result<AscentRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match participant.as_str() {
            "1001" => Ok(snapshot_fixtures::record(&[(Venue::Blockhouse, &[1, 3])])),
            "2001" => Ok(snapshot_fixtures::record(&[(Venue::Newton, &[2])])),
            other => Err(BlocError::parse(format!("unknown participant {other}"))),
        }
    }
}

#[derive(Default, Clone)]
struct RecordingPublisher {
    published: Arc<Mutex<Vec<PathBuf>>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, output_dir: &Path) {
        self.published.lock().unwrap().push(output_dir.to_path_buf());
    }
}

/// Writes the panel captions and today's absolute bars as text instead of
/// drawing, so the full run needs no fonts.
#[derive(Default, Clone)]
struct CaptionRenderer {
    rendered: Arc<Mutex<Vec<PathBuf>>>,
}

impl ComparisonRenderer for CaptionRenderer {
    fn render(&self, comparison: &VenueComparison, _style: &ChartStyle, path: &Path) -> Result<()> {
        let mut text = format!("{}\n", comparison.venue);
        for panel in &comparison.panels {
            text.push_str(&format!("{} {:?}\n", panel.title(), &panel.today[..3]));
        }
        std::fs::write(path, text)?;
        self.rendered.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = dir.join("data");
    config.storage.output_root = dir.join("out");
    config.graphs.width = 1200;
    config.graphs.height = 600;
    config
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
}

#[tokio::test]
async fn test_daily_run_writes_charts_and_publishes() {
    let dir = create_temp_dir();
    let source = CountingSource::default();
    let publisher = RecordingPublisher::default();
    let renderer = CaptionRenderer::default();
    let pipeline = Pipeline::new(
        config_in(dir.path()),
        source.clone(),
        source.clone(),
        publisher.clone(),
    )
    .with_renderer(renderer.clone());

    let report = pipeline.run_for(day()).await.unwrap();

    assert!(report.fetched);
    assert!(report.baseline_fallback);
    assert_eq!(report.output_dir, dir.path().join("out").join("2025-07-14"));
    assert!(report.snapshot_copy.ends_with("2025-07-14/2025-07-14.json"));
    assert!(report.snapshot_copy.is_file());

    let names: Vec<_> = report
        .charts
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "2025-07-14_blockhouse.png",
            "2025-07-14_boulderclub.png",
            "2025-07-14_newton.png"
        ]
    );
    assert!(report.charts.iter().all(|p| p.is_file()));

    assert_eq!(*renderer.rendered.lock().unwrap(), report.charts);

    // blockhouse: male 1001 climbed boulders 1 and 3, compared against itself
    let blockhouse = std::fs::read_to_string(&report.charts[0]).unwrap();
    assert!(blockhouse.starts_with("blockhouse\n"));
    assert!(blockhouse.contains("alle absolut [1.0, 1.0, 0.0]"));
    assert!(blockhouse.contains("weiblich absolut [0.0, 0.0, 0.0]"));

    // two rankings, two profiles
    assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    assert_eq!(*publisher.published.lock().unwrap(), vec![report.output_dir.clone()]);
}

#[tokio::test]
#[ignore = "requires system fonts"]
async fn test_daily_run_writes_png_charts() {
    let dir = create_temp_dir();
    let source = CountingSource::default();
    let pipeline = Pipeline::new(
        config_in(dir.path()),
        source.clone(),
        source,
        RecordingPublisher::default(),
    );

    let report = pipeline.run_for(day()).await.unwrap();
    assert_eq!(report.charts.len(), 3);
    for chart in &report.charts {
        let bytes = std::fs::read(chart).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}

#[tokio::test]
async fn test_cached_snapshot_is_reused_without_network() {
    let dir = create_temp_dir();
    let config = config_in(dir.path());
    let store = SnapshotStore::new(&config.storage.data_dir);
    store.save(day(), &snapshot_fixtures::busy_day()).await.unwrap();
    store
        .save(day().pred_opt().unwrap(), &snapshot_fixtures::two_climbers())
        .await
        .unwrap();

    let source = CountingSource::default();
    let publisher = RecordingPublisher::default();
    let pipeline = Pipeline::new(config, source.clone(), source.clone(), publisher.clone())
        .with_renderer(CaptionRenderer::default());

    let report = pipeline.run_for(day()).await.unwrap();
    assert!(!report.fetched);
    assert!(!report.baseline_fallback);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    assert_eq!(publisher.published.lock().unwrap().len(), 1);

    let copied = std::fs::read_to_string(&report.snapshot_copy).unwrap();
    let original = std::fs::read_to_string(store.path_for(day())).unwrap();
    assert_eq!(copied, original);
}

struct FlakyJob {
    attempts: AtomicUsize,
}

#[async_trait]
impl DailyJob for FlakyJob {
    async fn run(&self, _date: NaiveDate) -> anyhow::Result<()> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            anyhow::bail!("ranking endpoint returned 502");
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_failed_day_is_retried_at_next_trigger() {
    let start = day().and_hms_opt(2, 0, 0).unwrap();
    let mut schedule = DailySchedule::new(
        chrono::NaiveTime::from_hms_opt(3, 0, 0).unwrap(),
        Duration::from_secs(600),
        start,
    );
    let job = FlakyJob {
        attempts: AtomicUsize::new(0),
    };

    let first = day().and_hms_opt(3, 1, 0).unwrap();
    assert!(schedule.is_due(first));
    assert!(!schedule.run_job(&job, first, || first).await);
    assert!(!schedule.is_due(day().and_hms_opt(23, 59, 0).unwrap()));

    let second = day().succ_opt().unwrap().and_hms_opt(3, 1, 0).unwrap();
    assert!(schedule.is_due(second));
    assert!(schedule.run_job(&job, second, || second).await);
    assert_eq!(schedule.last_success(), day().succ_opt());
}
