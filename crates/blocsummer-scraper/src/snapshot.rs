//! Daily snapshot persistence and the today/yesterday loader.

use crate::traits::{AscentSource, ParticipantSource};
use blocsummer_common::{previous_day, snapshot_file_name, Category, DailySnapshot, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Flat directory of `YYYY-MM-DD.json` snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the snapshot file for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(snapshot_file_name(date))
    }

    /// Whether a snapshot for `date` has been written.
    pub fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).is_file()
    }

    /// Reads the snapshot for `date`, or `None` if no file exists.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub async fn load(&self, date: NaiveDate) -> Result<Option<DailySnapshot>> {
        let path = self.path_for(date);
        if !path.is_file() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let snapshot = serde_json::from_str(&content)?;
        debug!("Read snapshot {}", path.display());
        Ok(Some(snapshot))
    }

    /// Writes the snapshot for `date` and returns its path.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub async fn save(&self, date: NaiveDate, snapshot: &DailySnapshot) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let path = self.path_for(date);
        let content = serde_json::to_string(snapshot)?;
        tokio::fs::write(&path, content).await?;
        info!("Wrote snapshot {}", path.display());
        Ok(path)
    }
}

/// Today's and yesterday's snapshots for one pipeline run.
#[derive(Debug, Clone)]
pub struct LoadedSnapshots {
    /// Date of the run.
    pub date: NaiveDate,
    /// Today's snapshot.
    pub today: DailySnapshot,
    /// Yesterday's snapshot, or a copy of today's.
    pub yesterday: DailySnapshot,
    /// File today's snapshot was read from or written to.
    pub today_path: PathBuf,
    /// Whether today's snapshot was scraped in this run.
    pub fetched: bool,
    /// Whether `yesterday` is a copy of `today` because no file existed.
    pub baseline_fallback: bool,
}

/// Assembles daily snapshots from the sources, caching them in the store.
pub struct SnapshotLoader<'a> {
    participants: &'a dyn ParticipantSource,
    ascents: &'a dyn AscentSource,
    store: &'a SnapshotStore,
}

impl<'a> SnapshotLoader<'a> {
    /// Creates a loader over the given sources and store.
    pub fn new(
        participants: &'a dyn ParticipantSource,
        ascents: &'a dyn AscentSource,
        store: &'a SnapshotStore,
    ) -> Self {
        Self {
            participants,
            ascents,
            store,
        }
    }

    /// Scrapes a fresh snapshot, one request at a time.
    ///
    /// # Errors
    ///
    /// The first failing request or parse aborts the fetch.
    pub async fn fetch(&self) -> Result<DailySnapshot> {
        let mut snapshot = DailySnapshot::new();

        for category in Category::ALL {
            snapshot.ensure_category(category);
            let ids = self.participants.participants(category).await?;
            for id in ids {
                let record = self.ascents.ascents(&id, category).await?;
                snapshot.insert(category, id, record);
            }
        }

        info!("Fetched {} participants", snapshot.participant_count());
        Ok(snapshot)
    }

    /// Returns the stored snapshot for `date`, scraping and storing it first
    /// when missing. The flag tells whether a scrape happened.
    ///
    /// # Errors
    ///
    /// Propagates store and fetch errors.
    pub async fn load_or_fetch(&self, date: NaiveDate) -> Result<(DailySnapshot, bool)> {
        if let Some(snapshot) = self.store.load(date).await? {
            info!("Using cached snapshot for {}", date);
            return Ok((snapshot, false));
        }

        let snapshot = self.fetch().await?;
        self.store.save(date, &snapshot).await?;
        Ok((snapshot, true))
    }

    /// Loads `date` and its baseline from the day before.
    ///
    /// # Errors
    ///
    /// Propagates store and fetch errors; a missing baseline is not an error.
    pub async fn load(&self, date: NaiveDate) -> Result<LoadedSnapshots> {
        let (today, fetched) = self.load_or_fetch(date).await?;

        let (yesterday, baseline_fallback) = match self.store.load(previous_day(date)).await? {
            Some(snapshot) => (snapshot, false),
            None => {
                warn!(
                    "No snapshot for {}, comparing {} against itself",
                    previous_day(date),
                    date
                );
                (today.clone(), true)
            }
        };

        Ok(LoadedSnapshots {
            date,
            today_path: self.store.path_for(date),
            today,
            yesterday,
            fetched,
            baseline_fallback,
        })
    }
}
