//! Structured logging infrastructure for Blocsummer Stats

use crate::error::{BlocError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// File name prefix of the rolling log files
pub const LOG_FILE_PREFIX: &str = "blocsummer.log";

/// Output format of the console log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human readable output with colors
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Configuration for the logging system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "blocsummer_scraper=trace")
    pub level: String,
    /// Console output format
    pub format: LogFormat,
    /// Directory for daily rolling log files; console only when unset
    pub directory: Option<PathBuf>,
    /// Whether to log span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
///
/// # Errors
///
/// Returns a configuration error if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| BlocError::config_with_source("Invalid log filter", e))?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = fmt::layer()
        .with_span_events(span_events.clone())
        .with_target(config.include_targets);
    layers.push(match config.format {
        LogFormat::Pretty => console.pretty().boxed(),
        LogFormat::Compact => console.compact().boxed(),
        LogFormat::Json => console.json().boxed(),
    });

    if let Some(directory) = &config.directory {
        let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(appender)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| BlocError::config_with_source("Failed to install tracing subscriber", e))
}

/// Run `f` with a plain console subscriber at the default level.
///
/// The subscriber only covers the current thread for the duration of `f`, so
/// [`init_logging`] can install the configured one afterwards. Used while the
/// configuration itself is being loaded.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::new(LoggingConfig::default().level))
        .with_target(true)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}
