//! Configuration schema definitions.

use blocsummer_common::{Category, LoggingConfig, Venue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot, output and publish locations.
    pub storage: StorageConfig,
    /// Daily trigger settings.
    pub scheduling: SchedulingConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Chart image settings.
    pub graphs: GraphsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Fixed description of the competition; never read from a file.
    #[serde(skip)]
    pub competition: CompetitionConfig,
}

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the `YYYY-MM-DD.json` snapshots.
    pub data_dir: PathBuf,
    /// Root of the dated chart directories.
    pub output_root: PathBuf,
    /// Executable run after the charts are written.
    pub publish_hook: PathBuf,
    /// Whether the publish hook runs at all.
    pub publish_enabled: bool,
}

/// Scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Local wall-clock time of the daily run, `HH:MM`.
    pub daily_at: String,
    /// Seconds slept between due checks.
    pub poll_interval_seconds: u64,
    /// Run the pipeline once before entering the loop.
    pub run_on_startup: bool,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Per-request timeout; requests may block indefinitely when unset.
    pub request_timeout_seconds: Option<u64>,
}

/// Chart image configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphsConfig {
    /// Composite image width in pixels.
    pub width: u32,
    /// Composite image height in pixels.
    pub height: u32,
    /// Font family for titles and labels.
    pub font_family: String,
}

/// The competition being tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionConfig {
    /// Boulders per venue.
    pub boulder_count: usize,
    /// Venues in page order.
    pub venues: Vec<VenueSpec>,
    /// Ranking classes.
    pub categories: Vec<CategorySpec>,
    /// Remote endpoints and markup markers.
    pub source: SourceConfig,
}

/// How a venue appears on the profile page and in snapshot keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueSpec {
    /// The venue.
    pub venue: Venue,
    /// Label preceding the venue's section on the profile page.
    pub page_label: String,
    /// Snapshot keys containing this fragment route to the venue.
    /// `None` marks the fallback venue.
    pub route_fragment: Option<String>,
}

/// Query parameters identifying a ranking class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    /// The category.
    pub category: Category,
    /// Ranking class id (`KLid` / `k`).
    pub class_id: u32,
    /// Ranking class display name (`KLBez`).
    pub class_name: String,
}

/// Remote endpoints and the markers used to cut data out of their markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Site root, without trailing slash.
    pub base_url: String,
    /// Path of the ranking endpoint.
    pub ranking_path: String,
    /// Path prefix of the participant profile page.
    pub profile_path: String,
    /// Competition id (`CID` / `c`).
    pub competition_id: u32,
    /// Event id (`VID` / `v`).
    pub event_id: u32,
    /// Region id (`REid` / `r`).
    pub region_id: u32,
    /// Region display name (`REBez`).
    pub region_name: String,
    /// JSON field of the ranking response holding the HTML fragment.
    pub ranking_body_field: String,
    /// Marker preceding every ranking row.
    pub participant_marker: String,
    /// Marker preceding the participant token inside a row.
    pub participant_id_marker: String,
    /// URL prefix of the per-boulder status icons.
    pub icon_prefix: String,
}

impl CompetitionConfig {
    /// Routes a snapshot venue key to a venue by substring match.
    ///
    /// Venues are tried in order; the first whose fragment occurs anywhere in
    /// `key` wins. Keys matching no fragment go to the fallback venue.
    pub fn route_venue(&self, key: &str) -> Venue {
        for spec in &self.venues {
            if let Some(fragment) = &spec.route_fragment {
                if key.contains(fragment.as_str()) {
                    return spec.venue;
                }
            }
        }
        self.venues
            .iter()
            .find(|spec| spec.route_fragment.is_none())
            .map_or(Venue::Newton, |spec| spec.venue)
    }

    /// Query parameters of a category, if configured.
    pub fn category(&self, category: Category) -> Option<&CategorySpec> {
        self.categories.iter().find(|spec| spec.category == category)
    }
}
