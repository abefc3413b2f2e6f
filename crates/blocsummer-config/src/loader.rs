//! Configuration loading utilities

use crate::Config;
use blocsummer_common::{BlocError, Result as BlocResult};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "BLOCSUMMER_CONFIG";

/// Configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "blocsummer.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A setting is out of range or malformed
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for BlocError {
    fn from(err: ConfigError) -> Self {
        BlocError::config_with_source(err.to_string(), err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file with environment variable overrides
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, an override does not
    /// parse, or the result does not validate.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse(&content)?;

        Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from the environment-selected file, the default
    /// file in the working directory, or built-in defaults
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load_config`].
    pub fn load() -> BlocResult<Config> {
        let config = match Self::locate(env::var(CONFIG_PATH_ENV).ok()) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load_config(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                let mut config = Config::default();
                Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
                config.validate()?;
                config
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load_config`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BlocResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Parse a TOML document; missing sections and keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed TOML.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn locate(explicit: Option<String>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        fallback.exists().then(|| fallback.to_path_buf())
    }

    /// Apply `BLOCSUMMER_*` overrides, reading variables through `lookup`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParseError`] for unparseable numbers.
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("BLOCSUMMER_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("BLOCSUMMER_OUTPUT_ROOT") {
            config.storage.output_root = PathBuf::from(dir);
        }

        if let Some(hook) = lookup("BLOCSUMMER_PUBLISH_HOOK") {
            if hook.is_empty() {
                config.storage.publish_enabled = false;
            } else {
                config.storage.publish_hook = PathBuf::from(hook);
            }
        }

        if let Some(at) = lookup("BLOCSUMMER_DAILY_AT") {
            config.scheduling.daily_at = at;
        }

        if let Some(interval) = lookup("BLOCSUMMER_POLL_INTERVAL") {
            config.scheduling.poll_interval_seconds =
                interval.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "BLOCSUMMER_POLL_INTERVAL".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(level) = lookup("BLOCSUMMER_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(dir) = lookup("BLOCSUMMER_LOG_DIR") {
            config.logging.directory = Some(PathBuf::from(dir));
        }

        debug!("Environment overrides applied");
        Ok(())
    }
}
