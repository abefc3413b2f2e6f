//! Configuration validation.

use crate::loader::ConfigError;
use crate::schema::{Config, SchedulingConfig};
use chrono::NaiveTime;
use url::Url;

const IMAGE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 100..=10_000;

impl SchedulingConfig {
    /// Parses `daily_at` as a wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] unless `daily_at` is `HH:MM`.
    pub fn daily_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.daily_at, "%H:%M").map_err(|_| {
            ConfigError::Invalid(format!(
                "scheduling.daily_at must be HH:MM, got '{}'",
                self.daily_at
            ))
        })
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduling.daily_time()?;

        if self.scheduling.poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "scheduling.poll_interval_seconds must be greater than 0".to_string(),
            ));
        }

        if self.http.request_timeout_seconds == Some(0) {
            return Err(ConfigError::Invalid(
                "http.request_timeout_seconds must be greater than 0 when set".to_string(),
            ));
        }

        if !IMAGE_SIZE_RANGE.contains(&self.graphs.width)
            || !IMAGE_SIZE_RANGE.contains(&self.graphs.height)
        {
            return Err(ConfigError::Invalid(format!(
                "graphs.width and graphs.height must be within {}..={}",
                IMAGE_SIZE_RANGE.start(),
                IMAGE_SIZE_RANGE.end()
            )));
        }

        let competition = &self.competition;
        if competition.boulder_count == 0 {
            return Err(ConfigError::Invalid(
                "competition.boulder_count must be greater than 0".to_string(),
            ));
        }

        Url::parse(&competition.source.base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "competition.source.base_url '{}' is not a valid URL: {e}",
                competition.source.base_url
            ))
        })?;

        for spec in &competition.venues {
            let routed = competition.route_venue(spec.venue.slug());
            if routed != spec.venue {
                return Err(ConfigError::Invalid(format!(
                    "venue '{}' would be routed to '{}'",
                    spec.venue, routed
                )));
            }
        }

        Ok(())
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    ///
    /// # Errors
    ///
    /// See [`Config::validate`].
    pub fn validate(config: &Config) -> blocsummer_common::Result<()> {
        config.validate().map_err(Into::into)
    }
}
