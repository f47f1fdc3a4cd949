//! Chrome/Chromium backend over the DevTools protocol

use super::{BrowserError, BrowserLauncher, BrowserResult, BrowserSession};
use crate::config::BrowserSettings;
use crate::selector::Locator;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::fmt::Display;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long the resource count must hold still before the network is idle
const NETWORK_QUIET: Duration = Duration::from_millis(500);

/// Flags the current document so a replacement can be told apart from it
const MARK_DOCUMENT: &str = "window.__trawlDeparted = true";

const READINESS_SCRIPT: &str = r#"
    (function() {
        return {
            readyState: document.readyState,
            resources: performance.getEntriesByType('resource').length,
            departed: window.__trawlDeparted === true,
            href: location.href
        };
    })()
"#;

fn protocol(err: impl Display) -> BrowserError {
    BrowserError::Protocol(err.to_string())
}

/// Launches one Chrome process per session
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> BrowserResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.settings.viewport_width, self.settings.viewport_height)
            .request_timeout(self.settings.navigation_timeout())
            .no_sandbox()
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-notifications")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        if !self.settings.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &self.settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        let config = self.browser_config()?;

        info!("Launching browser (headless: {})", self.settings.headless);
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler must be polled for any page command to complete
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {:?}", e);
                }
            }
            debug!("Browser event handler task completed");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::Launch(format!("failed to open page: {}", e)));
            }
        };

        Ok(Box::new(ChromiumSession {
            browser: Mutex::new(browser),
            page,
            handler,
            departed_from: Mutex::new(None),
        }))
    }
}

/// Document state sampled by [`READINESS_SCRIPT`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Readiness {
    ready_state: String,
    resources: u64,
    departed: bool,
    href: String,
}

/// Decides network idleness from successive readiness samples
///
/// Idle means the document is complete and no resource entry has been added
/// for [`NETWORK_QUIET`].
#[derive(Debug, Default)]
struct IdleTracker {
    stable_since: Option<(u64, Instant)>,
}

impl IdleTracker {
    fn observe(&mut self, complete: bool, resources: u64, now: Instant) -> bool {
        if !complete {
            self.stable_since = None;
            return false;
        }
        match self.stable_since {
            Some((count, since)) if count == resources => now.duration_since(since) >= NETWORK_QUIET,
            _ => {
                self.stable_since = Some((resources, now));
                false
            }
        }
    }
}

/// A browser process with a single page
struct ChromiumSession {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    /// URL of the document a click was issued from, until the page leaves it
    departed_from: Mutex<Option<String>>,
}

impl ChromiumSession {
    async fn readiness(&self) -> BrowserResult<Readiness> {
        self.page
            .evaluate(READINESS_SCRIPT)
            .await
            .map_err(protocol)?
            .into_value()
            .map_err(protocol)
    }

    /// Polls until the document is complete and the network has gone quiet
    async fn wait_until_idle(
        &self,
        start: Instant,
        timeout: Duration,
        operation: &'static str,
    ) -> BrowserResult<()> {
        let mut idle = IdleTracker::default();
        loop {
            match self.readiness().await {
                Ok(state) => {
                    let complete = state.ready_state == "complete";
                    if idle.observe(complete, state.resources, Instant::now()) {
                        debug!("{} settled after {:?}", state.href, start.elapsed());
                        return Ok(());
                    }
                }
                // The execution context is torn down while a document is replaced
                Err(e) => debug!("Readiness check failed, retrying: {}", e),
            }
            if start.elapsed() >= timeout {
                return Err(BrowserError::Timeout {
                    operation,
                    after: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Polls until the page has left the document `origin` was clicked from
    async fn wait_for_departure(
        &self,
        origin: &str,
        start: Instant,
        timeout: Duration,
    ) -> BrowserResult<()> {
        loop {
            match self.readiness().await {
                Ok(state) if !state.departed || state.href != origin => return Ok(()),
                Ok(_) => {}
                Err(e) => debug!("Departure check failed, retrying: {}", e),
            }
            if start.elapsed() >= timeout {
                return Err(BrowserError::Timeout {
                    operation: "post-click navigation",
                    after: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn set_viewport(&self, width: u32, height: u32) -> BrowserResult<()> {
        let params =
            SetDeviceMetricsOverrideParams::new(i64::from(width), i64::from(height), 1.0, false);
        self.page.execute(params).await.map_err(protocol)?;
        Ok(())
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> BrowserResult<()> {
        debug!("Navigating to {}", url);
        let start = Instant::now();

        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(protocol(e)),
            Err(_) => {
                return Err(BrowserError::Timeout {
                    operation: "navigation",
                    after: timeout,
                })
            }
        }

        self.wait_until_idle(start, timeout, "navigation").await
    }

    async fn wait_for_selector(&self, css: &str, timeout: Duration) -> BrowserResult<()> {
        let start = Instant::now();
        loop {
            if self.page.find_element(css).await.is_ok() {
                debug!("{} appeared after {:?}", css, start.elapsed());
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(BrowserError::Timeout {
                    operation: "wait for selector",
                    after: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn content(&self) -> BrowserResult<String> {
        self.page.content().await.map_err(protocol)
    }

    async fn current_url(&self) -> BrowserResult<String> {
        self.page
            .url()
            .await
            .map_err(protocol)?
            .ok_or_else(|| BrowserError::Protocol("page has no URL".to_string()))
    }

    async fn click(&self, locator: &Locator) -> BrowserResult<()> {
        let elements = self
            .page
            .find_elements(locator.css.as_str())
            .await
            .map_err(protocol)?;

        let element = elements
            .get(locator.index)
            .ok_or_else(|| BrowserError::ElementMissing {
                css: locator.css.clone(),
                index: locator.index,
            })?;

        self.page.evaluate(MARK_DOCUMENT).await.map_err(protocol)?;
        let origin = self.current_url().await?;
        *self.departed_from.lock().await = Some(origin);

        element.click().await.map_err(protocol)?;
        Ok(())
    }

    async fn wait_for_navigation(&self, timeout: Duration) -> BrowserResult<()> {
        let start = Instant::now();
        let origin = self.departed_from.lock().await.take();
        if let Some(origin) = origin {
            self.wait_for_departure(&origin, start, timeout).await?;
        }
        self.wait_until_idle(start, timeout, "post-click navigation")
            .await
    }

    async fn close(&mut self) -> BrowserResult<()> {
        let browser = self.browser.get_mut();
        let closed = browser.close().await.map(|_| ()).map_err(protocol);

        if let Err(e) = browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }

        self.handler.abort();
        closed
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // Browser's own drop kills the process; the handler would otherwise spin
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_requires_quiet_window() {
        let mut idle = IdleTracker::default();
        let t0 = Instant::now();

        assert!(!idle.observe(true, 4, t0));
        assert!(!idle.observe(true, 4, t0 + Duration::from_millis(200)));
        assert!(idle.observe(true, 4, t0 + NETWORK_QUIET));
    }

    #[test]
    fn test_new_resources_restart_quiet_window() {
        let mut idle = IdleTracker::default();
        let t0 = Instant::now();

        idle.observe(true, 4, t0);
        assert!(!idle.observe(true, 6, t0 + NETWORK_QUIET));
        assert!(!idle.observe(true, 6, t0 + NETWORK_QUIET + Duration::from_millis(100)));
        assert!(idle.observe(true, 6, t0 + NETWORK_QUIET * 2));
    }

    #[test]
    fn test_incomplete_document_is_never_idle() {
        let mut idle = IdleTracker::default();
        let t0 = Instant::now();

        idle.observe(true, 2, t0);
        assert!(!idle.observe(false, 2, t0 + NETWORK_QUIET));
        assert!(!idle.observe(true, 2, t0 + NETWORK_QUIET * 2));
    }

    #[test]
    fn test_readiness_sample_deserializes() {
        let state: Readiness = serde_json::from_value(serde_json::json!({
            "readyState": "interactive",
            "resources": 12,
            "departed": true,
            "href": "https://example.com/page/1"
        }))
        .unwrap();

        assert_eq!(state.ready_state, "interactive");
        assert_eq!(state.resources, 12);
        assert!(state.departed);
    }

    #[test]
    fn test_config_builds_with_explicit_executable() {
        let settings = BrowserSettings {
            chrome_executable: Some("/usr/bin/chromium".to_string()),
            ..BrowserSettings::default()
        };
        let launcher = ChromiumLauncher::new(settings);
        assert!(launcher.browser_config().is_ok());
    }
}
