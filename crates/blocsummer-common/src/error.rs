//! Error types and utilities for Blocsummer Stats

use thiserror::Error;

/// Result type alias for Blocsummer operations
pub type Result<T> = std::result::Result<T, BlocError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Blocsummer operations
#[derive(Error, Debug)]
pub enum BlocError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (HTTP requests, status codes)
    #[error("Network error: {message}")]
    Network {
        /// What went wrong
        message: String,
        /// HTTP status code, when the server answered
        status_code: Option<u16>,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },

    /// Fetched markup did not have the expected shape
    #[error("Parse error: {message}")]
    Parse {
        /// What went wrong
        message: String,
        /// The marker that could not be found, if any
        marker: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        /// What went wrong
        message: String,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// What went wrong
        message: String,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },
}

impl BlocError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new network error with an HTTP status code
    pub fn network_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Network {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            marker: None,
        }
    }

    /// Create a parse error for a marker that was not present in the markup
    pub fn missing_marker(msg: impl Into<String>, marker: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            marker: Some(marker.into()),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Error conversion implementations for external types

/// Convert from `reqwest::Error` to `BlocError`
impl From<reqwest::Error> for BlocError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if let Some(status) = err.status() {
            Self::Network {
                message: format!("HTTP error: {}", status.as_u16()),
                status_code: Some(status.as_u16()),
                source: Some(Box::new(err)),
            }
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from `toml::de::Error` to `BlocError`
impl From<toml::de::Error> for BlocError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to `BlocError`
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for BlocError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
