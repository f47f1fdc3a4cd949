//! Scroll operation tests

use crate::support::{paginated_site, trawler, FakeFetcher};
use trawl::Termination;

#[tokio::test]
async fn test_blank_target_rejected_before_any_call() {
    let fetcher = FakeFetcher::serving("");
    let (trawler, browser) = trawler(fetcher.clone(), paginated_site(3));

    let response = trawler.scroll("  ", Some(3)).await;

    assert_eq!(response.failure_details().unwrap().error, "validation_error");
    assert_eq!(browser.launches(), 0);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_three_page_site_blocks() {
    let (trawler, browser) = trawler(FakeFetcher::serving(""), paginated_site(3));

    let report = trawler.try_scroll("archive.example", Some(5)).await.unwrap();

    assert_eq!(report.termination, Termination::Blocked);
    assert_eq!(report.pages_requested, 5);
    assert_eq!(report.pages_completed, 3);
    let titles: Vec<_> = report.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Archive 1", "Archive 2", "Archive 3"]);
    assert_eq!(browser.clicks(), 2);
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_five_pages_exhausts() {
    let (trawler, browser) = trawler(FakeFetcher::serving(""), paginated_site(8));

    let response = trawler.scroll("archive.example", Some(5)).await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["termination"], "exhausted");
    assert_eq!(json["pagesCompleted"], 5);
    assert_eq!(json["pages"][4]["page"], 5);
    assert_eq!(json["pages"][4]["title"], "Archive 5");
    assert_eq!(browser.clicks(), 4);
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_missing_page_count_means_one() {
    let (trawler, browser) = trawler(FakeFetcher::serving(""), paginated_site(3));

    for pages in [None, Some(0), Some(-2)] {
        let report = trawler.try_scroll("archive.example", pages).await.unwrap();
        assert_eq!(report.pages_requested, 1);
        assert_eq!(report.pages_completed, 1);
        assert_eq!(report.termination, Termination::Exhausted);
    }
    assert_eq!(browser.clicks(), 0);
}

#[tokio::test]
async fn test_stalled_navigation_fails_and_closes_once() {
    let (trawler, browser) = trawler(
        FakeFetcher::serving(""),
        paginated_site(3).failing_navigation(),
    );

    let response = trawler.scroll("archive.example", Some(3)).await;

    assert_eq!(response.failure_details().unwrap().error, "navigation_timeout");
    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.closes(), 1);
}
