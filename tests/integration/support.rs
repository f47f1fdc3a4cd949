//! Fake capabilities that count every call

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trawl::browser::mock::{MockCounters, MockLauncher, MockSite};
use trawl::config::Config;
use trawl::crawler::{FetchError, PageFetcher};
use trawl::Trawler;
use url::Url;

/// Serves one fixed body for every URL
pub struct FakeFetcher {
    body: Result<String, u16>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn serving(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Ok(body.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            body: Err(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body
            .clone()
            .map_err(|status| FetchError::Status { status })
    }
}

/// A paginated site of `count` pages where every page but the last links on
pub fn paginated_site(count: usize) -> MockSite {
    let pages = (1..=count)
        .map(|n| {
            let next = if n < count {
                format!(r#"<nav class="pagination"><a class="next" href="?p={}">»</a></nav>"#, n + 1)
            } else {
                String::new()
            };
            format!(
                "<html><head><title>Archive {n}</title></head>\
                 <body><article>Entry {n}</article>{next}</body></html>"
            )
        })
        .collect();
    MockSite::new(pages)
}

/// Builds a trawler over `fetcher` and a scripted browser serving `site`
pub fn trawler(fetcher: Arc<FakeFetcher>, site: MockSite) -> (Trawler, Arc<MockCounters>) {
    let launcher = MockLauncher::new(site);
    let counters = launcher.counters();
    let trawler = Trawler::with_capabilities(&Config::default(), fetcher, Arc::new(launcher));
    (trawler, counters)
}
