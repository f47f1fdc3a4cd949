//! Headless browser capability
//!
//! The rendered extractor and the pagination walker only ever talk to a
//! [`BrowserSession`]. Sessions come from a [`SessionPool`], which bounds how
//! many may be open at once and hands out a [`Session`] guard that must be
//! released on every exit path.
//!
//! Element selection never happens inside the browser: callers take a DOM
//! snapshot with [`Session::content`], resolve selectors against it, and hand
//! the resulting [`Locator`] back to [`Session::click`].

mod chromium;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use chromium::ChromiumLauncher;

use crate::config::BrowserSettings;
use crate::selector::Locator;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("No element matches {css} at position {index}")]
    ElementMissing { css: String, index: usize },

    #[error("Browser protocol error: {0}")]
    Protocol(String),

    #[error("Browser session is closed")]
    Closed,
}

impl BrowserError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// Per-operation time budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Initial navigation and post-click navigation
    pub navigation: Duration,
    /// First anchor after navigation
    pub content: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            content: Duration::from_secs(5),
        }
    }
}

impl From<&BrowserSettings> for Timeouts {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            navigation: settings.navigation_timeout(),
            content: settings.content_timeout(),
        }
    }
}

/// One exclusively owned browser tab
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn set_viewport(&self, width: u32, height: u32) -> BrowserResult<()>;

    /// Navigates and waits for the page to settle within `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> BrowserResult<()>;

    /// Waits until at least one element matches `css`
    async fn wait_for_selector(&self, css: &str, timeout: Duration) -> BrowserResult<()>;

    /// Serialized rendered DOM
    async fn content(&self) -> BrowserResult<String>;

    async fn current_url(&self) -> BrowserResult<String>;

    async fn click(&self, locator: &Locator) -> BrowserResult<()>;

    async fn wait_for_navigation(&self, timeout: Duration) -> BrowserResult<()>;

    /// Releases the underlying browser resources
    async fn close(&mut self) -> BrowserResult<()>;
}

/// Source of fresh browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserSession>>;
}

/// Hands out sessions under an optional concurrency ceiling
#[derive(Clone)]
pub struct SessionPool {
    launcher: Arc<dyn BrowserLauncher>,
    permits: Option<Arc<Semaphore>>,
    viewport: (u32, u32),
}

impl SessionPool {
    /// Creates a pool; `max_sessions` of `None` leaves it unbounded
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        max_sessions: Option<usize>,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            launcher,
            permits: max_sessions.map(|n| Arc::new(Semaphore::new(n.max(1)))),
            viewport,
        }
    }

    /// Number of sessions that could be opened right now without waiting
    pub fn available(&self) -> Option<usize> {
        self.permits.as_ref().map(|s| s.available_permits())
    }

    /// Launches a session with the configured viewport applied
    ///
    /// Waits for a permit when the ceiling is reached. The permit is held by
    /// the returned guard until it is released or dropped.
    pub async fn acquire(&self) -> BrowserResult<Session> {
        let permit = match &self.permits {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| BrowserError::Closed)?,
            ),
            None => None,
        };

        let inner = self.launcher.launch().await?;
        let session = Session {
            inner: Some(inner),
            _permit: permit,
        };

        let (width, height) = self.viewport;
        let applied = session.set_viewport(width, height).await;
        if let Err(e) = applied {
            session.release().await;
            return Err(e);
        }

        debug!("Browser session acquired ({}x{})", width, height);
        Ok(session)
    }
}

/// Scoped ownership of one browser session
///
/// Call [`Session::release`] when done. Dropping an unreleased session leaves
/// cleanup to the backend's own drop logic and logs a warning.
pub struct Session {
    inner: Option<Box<dyn BrowserSession>>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl Session {
    fn page(&self) -> BrowserResult<&dyn BrowserSession> {
        self.inner.as_deref().ok_or(BrowserError::Closed)
    }

    pub async fn set_viewport(&self, width: u32, height: u32) -> BrowserResult<()> {
        self.page()?.set_viewport(width, height).await
    }

    pub async fn navigate(&self, url: &str, timeout: Duration) -> BrowserResult<()> {
        self.page()?.navigate(url, timeout).await
    }

    pub async fn wait_for_selector(&self, css: &str, timeout: Duration) -> BrowserResult<()> {
        self.page()?.wait_for_selector(css, timeout).await
    }

    pub async fn content(&self) -> BrowserResult<String> {
        self.page()?.content().await
    }

    pub async fn current_url(&self) -> BrowserResult<String> {
        self.page()?.current_url().await
    }

    pub async fn click(&self, locator: &Locator) -> BrowserResult<()> {
        self.page()?.click(locator).await
    }

    pub async fn wait_for_navigation(&self, timeout: Duration) -> BrowserResult<()> {
        self.page()?.wait_for_navigation(timeout).await
    }

    /// Closes the session; failures are logged, never returned
    pub async fn release(mut self) {
        if let Some(mut inner) = self.inner.take() {
            match inner.close().await {
                Ok(()) => debug!("Browser session released"),
                Err(e) => warn!("Failed to close browser session cleanly: {}", e),
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.inner.is_some() {
            warn!("Browser session dropped without release");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockLauncher, MockSite};
    use super::*;

    #[tokio::test]
    async fn test_acquire_sets_viewport_and_release_closes_once() {
        let launcher = MockLauncher::new(MockSite::single("<html></html>"));
        let counters = launcher.counters();
        let pool = SessionPool::new(Arc::new(launcher), None, (1280, 800));

        let session = pool.acquire().await.unwrap();
        assert_eq!(counters.viewport(), Some((1280, 800)));
        session.release().await;

        assert_eq!(counters.launches(), 1);
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test]
    async fn test_ceiling_holds_permit_until_release() {
        let launcher = MockLauncher::new(MockSite::single("<html></html>"));
        let pool = SessionPool::new(Arc::new(launcher), Some(1), (800, 600));

        let first = pool.acquire().await.unwrap();
        assert_eq!(pool.available(), Some(0));

        let waiting = tokio::time::timeout(Duration::from_millis(50), pool.acquire()).await;
        assert!(waiting.is_err());

        first.release().await;
        assert_eq!(pool.available(), Some(1));

        let second = pool.acquire().await.unwrap();
        second.release().await;
    }

    #[tokio::test]
    async fn test_close_failure_is_swallowed() {
        let launcher = MockLauncher::new(MockSite::single("<html></html>").failing_close());
        let counters = launcher.counters();
        let pool = SessionPool::new(Arc::new(launcher), None, (1280, 800));

        let session = pool.acquire().await.unwrap();
        session.release().await;
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test]
    async fn test_launch_failure_propagates() {
        let launcher = MockLauncher::new(MockSite::single("<html></html>").failing_launch());
        let counters = launcher.counters();
        let pool = SessionPool::new(Arc::new(launcher), None, (1280, 800));

        let result = pool.acquire().await;
        assert!(matches!(result, Err(BrowserError::Launch(_))));
        assert_eq!(counters.closes(), 0);
    }

    #[test]
    fn test_unbounded_pool_reports_no_ceiling() {
        let launcher = MockLauncher::new(MockSite::single("<html></html>"));
        let pool = SessionPool::new(Arc::new(launcher), None, (1280, 800));
        assert_eq!(pool.available(), None);
    }
}
