//! Request-level operations
//!
//! [`Trawler`] is the single entry point for the two operations:
//!
//! - `search(target, query)`: generic sites get a static text scan, known
//!   engines get a rendered result extraction
//! - `scroll(target, pages)`: a pagination walk
//!
//! Inputs are validated before any fetch or browser launch. Every call
//! resolves to a [`Response`]; nothing panics past this boundary.

mod response;

pub use response::{Failure, Response, ScrollReport, SearchReport, Success};

use crate::browser::{BrowserLauncher, ChromiumLauncher, SessionPool, Timeouts};
use crate::config::{validate, Config};
use crate::crawler::{walk, HttpFetcher, PageFetcher};
use crate::engine::{classify, query_url, Dispatch};
use crate::extract::{extract_rendered, extract_static};
use crate::target::normalize_target;
use crate::{ConfigError, Result, TrawlError};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs searches and scrolls against injected capabilities
#[derive(Clone)]
pub struct Trawler {
    fetcher: Arc<dyn PageFetcher>,
    pool: SessionPool,
    timeouts: Timeouts,
}

impl Trawler {
    /// Builds a trawler with the reqwest fetcher and a Chrome launcher
    ///
    /// The configuration is validated first, so a `Config` built in code gets
    /// the same checks as one loaded from a file.
    pub fn new(config: &Config) -> Result<Self> {
        validate(config)?;
        let fetcher = HttpFetcher::new(&config.fetcher).map_err(|e| {
            ConfigError::Validation(format!("cannot build HTTP client from [fetcher]: {}", e))
        })?;
        let launcher = ChromiumLauncher::new(config.browser.clone());
        Ok(Self::with_capabilities(
            config,
            Arc::new(fetcher),
            Arc::new(launcher),
        ))
    }

    /// Builds a trawler around caller-supplied fetch and browser capabilities
    pub fn with_capabilities(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> Self {
        let browser = &config.browser;
        Self {
            fetcher,
            pool: SessionPool::new(
                launcher,
                browser.max_concurrent_sessions,
                (browser.viewport_width, browser.viewport_height),
            ),
            timeouts: Timeouts::from(browser),
        }
    }

    /// Searches `target` for `query`
    pub async fn search(&self, target: &str, query: &str) -> Response<SearchReport> {
        let result = self.try_search(target, query).await;
        if let Err(e) = &result {
            warn!("Search of '{}' failed: {}", target, e);
        }
        result.into()
    }

    /// Walks up to `pages` pages from `target`; absent or non-positive means 1
    pub async fn scroll(&self, target: &str, pages: Option<i64>) -> Response<ScrollReport> {
        let result = self.try_scroll(target, pages).await;
        if let Err(e) = &result {
            warn!("Scroll of '{}' failed: {}", target, e);
        }
        result.into()
    }

    /// Like [`Trawler::search`], returning the error instead of a payload
    pub async fn try_search(&self, target: &str, query: &str) -> Result<SearchReport> {
        let target = normalize_target(target)?;
        if query.trim().is_empty() {
            return Err(TrawlError::Validation("Search query is required".to_string()));
        }

        let dispatch = classify(&target);
        info!("Search of {} for '{}' ({})", target, query, dispatch);

        let (search_url, results) = match dispatch {
            Dispatch::Generic => {
                let results = extract_static(self.fetcher.as_ref(), &target, query).await?;
                (None, results)
            }
            Dispatch::Engine(profile) => {
                let url = query_url(profile, query)?;
                let results = extract_rendered(&self.pool, &url, profile, &self.timeouts).await?;
                (Some(url), results)
            }
        };

        Ok(SearchReport {
            target,
            query: query.to_string(),
            search_url,
            match_count: results.len(),
            results,
            completed_at: Utc::now(),
        })
    }

    /// Like [`Trawler::scroll`], returning the error instead of a payload
    pub async fn try_scroll(&self, target: &str, pages: Option<i64>) -> Result<ScrollReport> {
        let target = normalize_target(target)?;
        let pages = page_count(pages);

        let outcome = walk(&self.pool, &target, pages, &self.timeouts).await?;

        Ok(ScrollReport {
            target,
            pages_requested: outcome.pages_requested,
            pages_completed: outcome.pages.len(),
            termination: outcome.termination,
            pages: outcome.pages,
            completed_at: Utc::now(),
        })
    }
}

fn page_count(requested: Option<i64>) -> u32 {
    match requested {
        Some(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    }
}
