//! Result extraction from browser-rendered engine pages

use crate::browser::{Session, SessionPool, Timeouts};
use crate::crawler::resolve_link;
use crate::engine::{EngineProfile, ResultSelectors};
use crate::extract::ExtractionRecord;
use crate::selector::{
    resolve, resolve_all, visible_text, SelectorCandidate, Strategy, TextRule,
};
use crate::target::{host_and_port, Target};
use crate::{Result, TrawlError};
use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

/// Snippet reported when a structured result has none
pub const MISSING_SNIPPET: &str = "No snippet available";

/// Snippet reported for every hit found by the generic anchor rule
pub const GENERIC_SNIPPET: &str = "Snippet not extracted";

/// Anchor text must be longer than this to count as a generic hit
const GENERIC_MIN_TEXT_CHARS: usize = 15;

const SUBSTANTIAL_ANCHORS: &[SelectorCandidate] = &[SelectorCandidate::new(
    "substantial-anchor",
    Strategy::Text {
        tag: "a[href]",
        rule: TextRule::LongerThan(GENERIC_MIN_TEXT_CHARS),
    },
)];

/// First element that signals the page has rendered something
const CONTENT_ANCHOR: &str = "a";

/// Renders `query_url` and extracts one hit per result
///
/// A page that never renders an anchor yields no hits rather than an error.
pub async fn extract_rendered(
    pool: &SessionPool,
    query_url: &Target,
    profile: &EngineProfile,
    timeouts: &Timeouts,
) -> Result<Vec<ExtractionRecord>> {
    let session = pool.acquire().await?;
    let outcome = render_and_extract(&session, query_url, profile, timeouts).await;
    session.release().await;
    outcome
}

async fn render_and_extract(
    session: &Session,
    query_url: &Target,
    profile: &EngineProfile,
    timeouts: &Timeouts,
) -> Result<Vec<ExtractionRecord>> {
    info!("Rendering {} results from {}", profile.name, query_url);

    session
        .navigate(query_url.as_str(), timeouts.navigation)
        .await
        .map_err(|e| TrawlError::navigation(query_url.as_str(), timeouts.navigation, e))?;

    match session
        .wait_for_selector(CONTENT_ANCHOR, timeouts.content)
        .await
    {
        Ok(()) => {}
        Err(e) if e.is_timeout() => {
            let degraded = TrawlError::NoContentTimeout {
                url: query_url.to_string(),
                timeout: timeouts.content,
            };
            warn!("{}; reporting no results", degraded);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    }

    let html = session.content().await?;
    let page_url = match session.current_url().await {
        Ok(url) => Url::parse(&url).unwrap_or_else(|_| query_url.url().clone()),
        Err(e) => {
            debug!("Falling back to query URL as page URL: {}", e);
            query_url.url().clone()
        }
    };

    let hits = extract_hits(&html, &page_url, profile);
    info!("Extracted {} {} results", hits.len(), profile.name);
    Ok(hits)
}

/// Structured hits when the profile's chains find any, anchor hits otherwise
fn extract_hits(html: &str, page_url: &Url, profile: &EngineProfile) -> Vec<ExtractionRecord> {
    let document = Html::parse_document(html);

    if let Some(selectors) = &profile.results {
        let hits = structured_hits(&document, page_url, selectors);
        if !hits.is_empty() {
            return hits;
        }
        debug!(
            "No structured {} results on {}, falling back to anchors",
            profile.name, page_url
        );
    }

    generic_hits(&document, page_url)
}

/// One hit per result container that has both a title and a usable link
fn structured_hits(
    document: &Html,
    page_url: &Url,
    selectors: &ResultSelectors,
) -> Vec<ExtractionRecord> {
    let Some((via, containers)) = resolve_all(document.root_element(), selectors.containers)
    else {
        debug!("No result containers found on {}", page_url);
        return Vec::new();
    };
    debug!("{} result containers via '{}'", containers.len(), via);

    containers
        .into_iter()
        .filter_map(|container| {
            let title = resolve(container, selectors.title)?;
            let link = resolve(container, selectors.link)?;
            let href = link
                .element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, page_url))?;

            let snippet = resolve(container, selectors.snippet)
                .map(|m| visible_text(m.element))
                .unwrap_or_else(|| MISSING_SNIPPET.to_string());

            Some(ExtractionRecord::SearchHit {
                title: visible_text(title.element),
                link: href.to_string(),
                snippet,
            })
        })
        .collect()
}

/// Anchors pointing away from the page's own host with substantial text
fn generic_hits(document: &Html, page_url: &Url) -> Vec<ExtractionRecord> {
    let Some((_, anchors)) = resolve_all(document.root_element(), SUBSTANTIAL_ANCHORS) else {
        return Vec::new();
    };

    let own_host = host_and_port(page_url).unwrap_or_default();

    anchors
        .into_iter()
        .filter_map(|anchor| {
            let href = resolve_link(anchor.value().attr("href")?, page_url)?;
            if !own_host.is_empty() && href.as_str().contains(&own_host) {
                return None;
            }

            Some(ExtractionRecord::SearchHit {
                title: visible_text(anchor),
                link: href.to_string(),
                snippet: GENERIC_SNIPPET.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::{MockLauncher, MockSite};
    use crate::engine::{classify, query_url};
    use crate::target::normalize_target;
    use std::sync::Arc;

    const GOOGLE_PAGE: &str = r#"<html><body>
        <a href="/preferences">Settings</a>
        <div class="g">
            <a href="https://www.rust-lang.org/"><h3>Rust Programming Language</h3></a>
            <div class="VwiC3b">A language empowering   everyone.</div>
        </div>
        <div class="g">
            <a href="https://doc.rust-lang.org/book/"><h3>The Rust Book</h3></a>
        </div>
        <div class="g">
            <span>Ad without a link</span>
        </div>
    </body></html>"#;

    fn pool(site: MockSite) -> (SessionPool, Arc<crate::browser::mock::MockCounters>) {
        let launcher = MockLauncher::new(site);
        let counters = launcher.counters();
        (
            SessionPool::new(Arc::new(launcher), None, (1280, 800)),
            counters,
        )
    }

    fn engine(host: &str) -> &'static EngineProfile {
        let target = normalize_target(host).unwrap();
        classify(&target).engine().unwrap()
    }

    fn hits(records: &[ExtractionRecord]) -> Vec<(&str, &str, &str)> {
        records
            .iter()
            .map(|r| match r {
                ExtractionRecord::SearchHit {
                    title,
                    link,
                    snippet,
                } => (title.as_str(), link.as_str(), snippet.as_str()),
                other => panic!("unexpected record {:?}", other),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_google_results() {
        let google = engine("www.google.com");
        let url = query_url(google, "rust").unwrap();
        let (pool, counters) = pool(
            MockSite::single(GOOGLE_PAGE).at("https://www.google.com/search?q=rust"),
        );

        let records = extract_rendered(&pool, &url, google, &Timeouts::default())
            .await
            .unwrap();

        assert_eq!(
            hits(&records),
            vec![
                (
                    "Rust Programming Language",
                    "https://www.rust-lang.org/",
                    "A language empowering everyone."
                ),
                (
                    "The Rust Book",
                    "https://doc.rust-lang.org/book/",
                    MISSING_SNIPPET
                ),
            ]
        );
        assert_eq!(counters.navigations(), 1);
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test]
    async fn test_bing_results_resolve_relative_links() {
        let page = r#"<html><body><ol>
            <li class="b_algo">
                <h2><a href="/ck/a?u=rust">Rust at Bing</a></h2>
                <div class="b_caption"><p>Fast and reliable.</p></div>
            </li>
        </ol></body></html>"#;
        let bing = engine("bing.com");
        let url = query_url(bing, "rust").unwrap();
        let (pool, _) = pool(MockSite::single(page).at("https://www.bing.com/search?q=rust"));

        let records = extract_rendered(&pool, &url, bing, &Timeouts::default())
            .await
            .unwrap();

        assert_eq!(
            hits(&records),
            vec![(
                "Rust at Bing",
                "https://www.bing.com/ck/a?u=rust",
                "Fast and reliable."
            )]
        );
    }

    #[tokio::test]
    async fn test_generic_anchor_rule() {
        let page = r#"<html><body>
            <a href="https://search.yahoo.com/preferences">Search preferences page</a>
            <a href="https://www.rust-lang.org/">Rust Programming Language</a>
            <a href="https://short.example/">Too short</a>
            <a href="/relative/on/yahoo">A relative link that stays home</a>
        </body></html>"#;
        let yahoo = engine("yahoo.com");
        let url = query_url(yahoo, "rust").unwrap();
        let (pool, _) = pool(MockSite::single(page).at("https://search.yahoo.com/search?p=rust"));

        let records = extract_rendered(&pool, &url, yahoo, &Timeouts::default())
            .await
            .unwrap();

        assert_eq!(
            hits(&records),
            vec![(
                "Rust Programming Language",
                "https://www.rust-lang.org/",
                GENERIC_SNIPPET
            )]
        );
    }

    #[tokio::test]
    async fn test_drifted_structured_markup_falls_back_to_anchors() {
        let page = r#"<html><body>
            <div class="new-result">
                <a href="https://www.rust-lang.org/">Rust Programming Language home</a>
            </div>
            <a href="https://www.bing.com/images">Images on this very engine</a>
        </body></html>"#;
        let bing = engine("bing.com");
        let url = query_url(bing, "rust").unwrap();
        let (pool, _) = pool(MockSite::single(page).at("https://www.bing.com/search?q=rust"));

        let records = extract_rendered(&pool, &url, bing, &Timeouts::default())
            .await
            .unwrap();

        assert_eq!(
            hits(&records),
            vec![(
                "Rust Programming Language home",
                "https://www.rust-lang.org/",
                GENERIC_SNIPPET
            )]
        );
    }

    #[tokio::test]
    async fn test_no_content_degrades_to_empty() {
        let google = engine("google.com");
        let url = query_url(google, "rust").unwrap();
        let (pool, counters) = pool(MockSite::single("<html><body><p>loading</p></body></html>"));

        let records = extract_rendered(&pool, &url, google, &Timeouts::default())
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_closes_once() {
        let google = engine("google.com");
        let url = query_url(google, "rust").unwrap();
        let (pool, counters) = pool(MockSite::single(GOOGLE_PAGE).failing_navigation());

        let err = extract_rendered(&pool, &url, google, &Timeouts::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "navigation_timeout");
        assert_eq!(counters.closes(), 1);
    }

    #[tokio::test]
    async fn test_close_failure_does_not_mask_results() {
        let google = engine("google.com");
        let url = query_url(google, "rust").unwrap();
        let (pool, counters) = pool(MockSite::single(GOOGLE_PAGE).failing_close());

        let records = extract_rendered(&pool, &url, google, &Timeouts::default())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(counters.closes(), 1);
    }
}
