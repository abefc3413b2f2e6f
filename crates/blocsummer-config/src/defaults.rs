//! Default values, including the fixed competition description.

use crate::schema::*;
use blocsummer_common::{Category, LoggingConfig, Venue};
use std::path::PathBuf;

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            scheduling: SchedulingConfig::default(),
            http: HttpConfig::default(),
            graphs: GraphsConfig::default(),
            logging: LoggingConfig::default(),
            competition: CompetitionConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_root: PathBuf::from("/app/blocsummer"),
            publish_hook: PathBuf::from("./git.sh"),
            publish_enabled: true,
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            daily_at: "03:00".to_string(),
            poll_interval_seconds: 600,
            run_on_startup: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("blocsummer-stats/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for GraphsConfig {
    // 40 x 15 inch figure at 100 dpi
    fn default() -> Self {
        Self {
            width: 4000,
            height: 1500,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl Default for CompetitionConfig {
    fn default() -> Self {
        Self {
            boulder_count: 40,
            venues: vec![
                VenueSpec {
                    venue: Venue::Blockhouse,
                    page_label: "BLOC house:".to_string(),
                    route_fragment: Some("bloc".to_string()),
                },
                VenueSpec {
                    venue: Venue::Boulderclub,
                    page_label: "Boulderclub:".to_string(),
                    route_fragment: Some("bould".to_string()),
                },
                VenueSpec {
                    venue: Venue::Newton,
                    page_label: "Newton:".to_string(),
                    route_fragment: None,
                },
            ],
            categories: vec![
                CategorySpec {
                    category: Category::Male,
                    class_id: 152,
                    class_name: "Männer".to_string(),
                },
                CategorySpec {
                    category: Category::Female,
                    class_id: 153,
                    class_name: "Frauen".to_string(),
                },
            ],
            source: SourceConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://boulder-top.com".to_string(),
            ranking_path: "ranking-xmlhttp_loadRanking.php".to_string(),
            profile_path: "comp/bss25/page/boulder-eintragen".to_string(),
            competition_id: 53,
            event_id: 42,
            region_id: 67,
            region_name: "Graz".to_string(),
            ranking_body_field: "Return_DIV_Body".to_string(),
            participant_marker: r#"<div class="ranking-text"><span class="ranking-left">"#.to_string(),
            participant_id_marker: r#"id="s-"#.to_string(),
            icon_prefix: "https://boulder-top.com/assets/img/bss25/co_icon_bouldereintragen_"
                .to_string(),
        }
    }
}
