//! Trawl: a paginated crawler and query-driven page extractor
//!
//! This crate walks chains of linked pages collecting per-page summaries, scans
//! static pages for text matches, and drives a headless browser against known
//! search engines to pull ranked results out of markup that changes without
//! notice.

pub mod api;
pub mod browser;
pub mod config;
pub mod crawler;
pub mod engine;
pub mod extract;
pub mod selector;
pub mod state;
pub mod target;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Trawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: crawler::FetchError,
    },

    #[error("Navigation to {url} did not settle within {timeout:?}")]
    NavigationTimeout {
        url: String,
        timeout: Duration,
        #[source]
        source: browser::BrowserError,
    },

    #[error("No content appeared on {url} within {timeout:?}")]
    NoContentTimeout { url: String, timeout: Duration },

    #[error("Browser session error: {0}")]
    BrowserResource(#[from] browser::BrowserError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TrawlError {
    /// Stable machine-readable tag used in failure payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Fetch { .. } => "fetch_error",
            Self::NavigationTimeout { .. } => "navigation_timeout",
            Self::NoContentTimeout { .. } => "no_content_timeout",
            Self::BrowserResource(_) => "browser_resource_error",
            Self::Config(_) => "config_error",
        }
    }

    /// Maps a failed navigation to `NavigationTimeout` when the budget ran
    /// out, and to `BrowserResource` otherwise
    pub(crate) fn navigation(url: &str, timeout: Duration, err: browser::BrowserError) -> Self {
        if err.is_timeout() {
            Self::NavigationTimeout {
                url: url.to_string(),
                timeout,
                source: err,
            }
        } else {
            Self::BrowserResource(err)
        }
    }
}

impl From<TargetError> for TrawlError {
    fn from(err: TargetError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Target-specific errors
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Target URL is required")]
    Empty,

    #[error("Failed to parse target URL: {0}")]
    Parse(String),

    #[error("Invalid target scheme: {0}")]
    InvalidScheme(String),

    #[error("Target URL has no host")]
    MissingHost,
}

/// Result type alias for Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for target operations
pub type TargetResult<T> = std::result::Result<T, TargetError>;

// Re-export commonly used types
pub use api::{Response, ScrollReport, SearchReport, Trawler};
pub use config::Config;
pub use engine::{classify, Dispatch, EngineProfile};
pub use extract::ExtractionRecord;
pub use state::{PageSummary, Termination, WalkState};
pub use target::{normalize_target, Target};
