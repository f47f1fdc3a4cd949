//! HTTP fetcher implementation
//!
//! This module handles raw document retrieval for static extraction:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests following redirects
//! - Error classification
//!
//! Failures are returned once and never retried.

use crate::config::FetcherSettings;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Maximum redirect hops before a fetch is abandoned
const MAX_REDIRECTS: usize = 10;

/// Errors raised while fetching a raw document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("connection failed")]
    Connect(#[source] reqwest::Error),

    #[error("network error")]
    Network(#[source] reqwest::Error),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    fn classify(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connect(err)
        } else {
            Self::Network(err)
        }
    }
}

/// Source of raw (unrendered) HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use trawl::config::FetcherSettings;
/// use trawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &FetcherSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout())
        .connect_timeout(settings.connect_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetcherSettings) -> Result<Self, FetchError> {
        let client = build_http_client(settings).map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(FetchError::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("html") {
            debug!(
                "Fetched {} with content-type {:?}, parsing as HTML anyway",
                url, content_type
            );
        }

        response.text().await.map_err(FetchError::classify)
    }
}
