//! Scripted in-memory browser
//!
//! Compiled for this crate's unit tests and, through the `test-util` feature,
//! for integration tests that need a browser without Chrome.

use super::{BrowserError, BrowserLauncher, BrowserResult, BrowserSession};
use crate::selector::Locator;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A fake site: one HTML document per page, advanced by any click
#[derive(Debug, Clone, Default)]
pub struct MockSite {
    pages: Vec<String>,
    url: String,
    fail_launch: bool,
    fail_navigate: bool,
    fail_close: bool,
    fail_click: bool,
    fail_wait_after_click: bool,
}

impl MockSite {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            url: "https://example.com/".to_string(),
            ..Default::default()
        }
    }

    pub fn single(html: &str) -> Self {
        Self::new(vec![html.to_string()])
    }

    pub fn at(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigate = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn failing_click(mut self) -> Self {
        self.fail_click = true;
        self
    }

    pub fn failing_wait_after_click(mut self) -> Self {
        self.fail_wait_after_click = true;
        self
    }
}

/// Shared call counters, readable after the session is gone
#[derive(Debug, Default)]
pub struct MockCounters {
    launches: AtomicUsize,
    navigations: AtomicUsize,
    clicks: AtomicUsize,
    closes: AtomicUsize,
    viewport: Mutex<Option<(u32, u32)>>,
    clicked: Mutex<Vec<Locator>>,
}

impl MockCounters {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        *self.viewport.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clicked(&self) -> Vec<Locator> {
        self.clicked.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub struct MockLauncher {
    site: MockSite,
    counters: Arc<MockCounters>,
}

impl MockLauncher {
    pub fn new(site: MockSite) -> Self {
        Self {
            site,
            counters: Arc::new(MockCounters::default()),
        }
    }

    pub fn counters(&self) -> Arc<MockCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl BrowserLauncher for MockLauncher {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        if self.site.fail_launch {
            return Err(BrowserError::Launch("no chrome in test".to_string()));
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            site: self.site.clone(),
            counters: Arc::clone(&self.counters),
            position: AtomicUsize::new(0),
        }))
    }
}

struct MockSession {
    site: MockSite,
    counters: Arc<MockCounters>,
    position: AtomicUsize,
}

impl MockSession {
    fn current(&self) -> String {
        let index = self.position.load(Ordering::SeqCst);
        self.site.pages.get(index).cloned().unwrap_or_default()
    }
}

fn has_match(html: &str, css: &str) -> bool {
    let document = Html::parse_document(html);
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn set_viewport(&self, width: u32, height: u32) -> BrowserResult<()> {
        *self.counters.viewport.lock().unwrap_or_else(PoisonError::into_inner) = Some((width, height));
        Ok(())
    }

    async fn navigate(&self, _url: &str, timeout: Duration) -> BrowserResult<()> {
        self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        if self.site.fail_navigate {
            return Err(BrowserError::Timeout {
                operation: "navigation",
                after: timeout,
            });
        }
        self.position.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn wait_for_selector(&self, css: &str, timeout: Duration) -> BrowserResult<()> {
        if has_match(&self.current(), css) {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                operation: "wait for selector",
                after: timeout,
            })
        }
    }

    async fn content(&self) -> BrowserResult<String> {
        Ok(self.current())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.site.url.clone())
    }

    async fn click(&self, locator: &Locator) -> BrowserResult<()> {
        self.counters.clicks.fetch_add(1, Ordering::SeqCst);
        self.counters.clicked.lock().unwrap_or_else(PoisonError::into_inner).push(locator.clone());
        if self.site.fail_click {
            return Err(BrowserError::Protocol("click intercepted".to_string()));
        }
        let next = self.position.load(Ordering::SeqCst) + 1;
        if next < self.site.pages.len() {
            self.position.store(next, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn wait_for_navigation(&self, timeout: Duration) -> BrowserResult<()> {
        if self.site.fail_wait_after_click {
            return Err(BrowserError::Timeout {
                operation: "post-click navigation",
                after: timeout,
            });
        }
        Ok(())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.site.fail_close {
            return Err(BrowserError::Protocol("target already gone".to_string()));
        }
        Ok(())
    }
}
