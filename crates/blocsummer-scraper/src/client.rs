//! boulder-top.com client implementing the source traits over HTTP.

use crate::parse::{parse_ascents, parse_participants, ranking_fragment};
use crate::traits::{AscentSource, ParticipantSource};
use async_trait::async_trait;
use blocsummer_common::{AscentRecord, BlocError, Category, ParticipantId, Result};
use blocsummer_config::{CategorySpec, CompetitionConfig, HttpConfig};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Scrapes rankings and profile pages of the live competition site.
///
/// Requests are issued one at a time and never retried.
#[derive(Debug, Clone)]
pub struct BoulderTopClient {
    client: Client,
    competition: CompetitionConfig,
}

impl BoulderTopClient {
    /// Creates a client for `competition`.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built.
    pub fn new(competition: CompetitionConfig, http: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(http.user_agent.clone());
        if let Some(secs) = http.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BlocError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            competition,
        })
    }

    fn base_url(&self) -> &str {
        self.competition.source.base_url.trim_end_matches('/')
    }

    fn category_spec(&self, category: Category) -> Result<&CategorySpec> {
        self.competition
            .category(category)
            .ok_or_else(|| BlocError::config(format!("No ranking class configured for {category}")))
    }

    /// URL of the ranking endpoint.
    pub fn ranking_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.competition.source.ranking_path)
    }

    /// Query parameters selecting the ranking of one class.
    pub fn ranking_query(&self, spec: &CategorySpec) -> Vec<(&'static str, String)> {
        let source = &self.competition.source;
        vec![
            ("GTyp", "2".to_string()),
            ("CID", source.competition_id.to_string()),
            ("VID", source.event_id.to_string()),
            ("REid", source.region_id.to_string()),
            ("KLid", spec.class_id.to_string()),
            ("RankingTyp", "1".to_string()),
            ("REBez", source.region_name.clone()),
            ("KLBez", spec.class_name.clone()),
            ("HAID", String::new()),
        ]
    }

    /// URL of a participant's boulder entry page. The site encodes its
    /// parameters in the path, not the query string.
    pub fn profile_url(&self, participant: &ParticipantId, spec: &CategorySpec) -> String {
        let source = &self.competition.source;
        format!(
            "{}/{}/t={}&k={}&r={}&v={}&c={}&h=",
            self.base_url(),
            source.profile_path,
            participant,
            spec.class_id,
            source.region_id,
            source.event_id,
            source.competition_id,
        )
    }

    async fn get_text(&self, url: &str, query: &[(&'static str, String)]) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ParticipantSource for BoulderTopClient {
    #[instrument(skip(self), fields(category = %category))]
    async fn participants(&self, category: Category) -> Result<Vec<ParticipantId>> {
        let spec = self.category_spec(category)?;
        let text = self
            .get_text(&self.ranking_url(), &self.ranking_query(spec))
            .await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;

        let fragment = ranking_fragment(&body, &self.competition.source)?;
        let participants = parse_participants(fragment, &self.competition.source)?;

        info!("Found {} participants in category {}", participants.len(), category);
        Ok(participants)
    }
}

#[async_trait]
impl AscentSource for BoulderTopClient {
    #[instrument(skip(self), fields(participant = %participant, category = %category))]
    async fn ascents(&self, participant: &ParticipantId, category: Category) -> Result<AscentRecord> {
        let spec = self.category_spec(category)?;
        let page = self.get_text(&self.profile_url(participant, spec), &[]).await?;
        Ok(parse_ascents(&page, &self.competition))
    }
}
