//! Search operation tests

use crate::support::{trawler, FakeFetcher};
use std::sync::Arc;
use trawl::browser::mock::{MockLauncher, MockSite};
use trawl::config::Config;
use trawl::crawler::HttpFetcher;
use trawl::{ExtractionRecord, Trawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIDGET_PAGE: &str = r#"<html><body>
    <h2>widget</h2>
    <p>The widget catalogue</p>
    <ul><li>gears</li></ul>
</body></html>"#;

const GOOGLE_PAGE: &str = r#"<html><body>
    <div class="g">
        <a href="https://www.rust-lang.org/"><h3>Rust Programming Language</h3></a>
        <div class="VwiC3b">Reliable and efficient software.</div>
    </div>
</body></html>"#;

#[tokio::test]
async fn test_blank_inputs_rejected_before_any_call() {
    let fetcher = FakeFetcher::serving(WIDGET_PAGE);
    let (trawler, browser) = trawler(fetcher.clone(), MockSite::single(GOOGLE_PAGE));

    for (site, query) in [("", "widget"), ("   ", "widget"), ("example.com", ""), ("google.com", "  ")] {
        let response = trawler.search(site, query).await;
        let failure = response.failure_details().expect("expected failure");
        assert_eq!(failure.error, "validation_error", "{site:?} / {query:?}");
    }

    let response = trawler.search("ftp://example.com", "widget").await;
    assert_eq!(response.failure_details().unwrap().error, "validation_error");

    assert_eq!(fetcher.calls(), 0);
    assert_eq!(browser.launches(), 0);
}

#[tokio::test]
async fn test_generic_site_is_scanned_statically() {
    let fetcher = FakeFetcher::serving(WIDGET_PAGE);
    let (trawler, browser) = trawler(fetcher.clone(), MockSite::single(GOOGLE_PAGE));

    let report = trawler.try_search("shop.example", "Widget").await.unwrap();

    assert_eq!(report.target.as_str(), "https://shop.example/");
    assert_eq!(report.search_url, None);
    assert_eq!(report.match_count, 2);
    assert!(matches!(
        &report.results[0],
        ExtractionRecord::TextMatch { element, full_match: true, .. } if element == "h2"
    ));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(browser.launches(), 0);
}

#[tokio::test]
async fn test_engine_target_is_rendered() {
    let fetcher = FakeFetcher::serving(WIDGET_PAGE);
    let (trawler, browser) = trawler(
        fetcher.clone(),
        MockSite::single(GOOGLE_PAGE).at("https://www.google.com/search?q=rust%20lang"),
    );

    let response = trawler.search("google.com", "rust lang").await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["searchUrl"], "https://www.google.com/search?q=rust%20lang");
    assert_eq!(json["matchCount"], 1);
    assert_eq!(json["results"][0]["title"], "Rust Programming Language");
    assert_eq!(json["results"][0]["link"], "https://www.rust-lang.org/");
    assert_eq!(json["results"][0]["snippet"], "Reliable and efficient software.");

    assert_eq!(fetcher.calls(), 0);
    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_engine_without_content_reports_no_results() {
    let (trawler, browser) = trawler(
        FakeFetcher::serving(WIDGET_PAGE),
        MockSite::single("<html><body><p>consent wall</p></body></html>"),
    );

    let report = trawler.try_search("bing.com", "rust").await.unwrap();

    assert_eq!(report.match_count, 0);
    assert!(report.search_url.is_some());
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_stalled_engine_navigation_fails_and_closes_once() {
    let (trawler, browser) = trawler(
        FakeFetcher::serving(WIDGET_PAGE),
        MockSite::single(GOOGLE_PAGE).failing_navigation(),
    );

    let response = trawler.search("duckduckgo.com", "rust").await;
    let failure = response.failure_details().unwrap();

    assert_eq!(failure.error, "navigation_timeout");
    assert!(failure.cause.is_some());
    assert_eq!(browser.navigations(), 1);
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_fetch_failure_payload() {
    let fetcher = FakeFetcher::failing(502);
    let (trawler, _) = trawler(fetcher.clone(), MockSite::new(Vec::new()));

    let response = trawler.search("shop.example", "widget").await;
    let failure = response.failure_details().unwrap();

    assert_eq!(failure.error, "fetch_error");
    assert_eq!(failure.cause.as_deref(), Some("server responded with HTTP 502"));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_static_search_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(WIDGET_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config::default();
    let fetcher = HttpFetcher::new(&config.fetcher).unwrap();
    let launcher = MockLauncher::new(MockSite::new(Vec::new()));
    let browser = launcher.counters();
    let trawler = Trawler::with_capabilities(&config, Arc::new(fetcher), Arc::new(launcher));

    let report = trawler
        .try_search(&mock_server.uri(), "widget")
        .await
        .unwrap();

    assert_eq!(report.match_count, 2);
    assert_eq!(browser.launches(), 0);
    mock_server.verify().await;
}
