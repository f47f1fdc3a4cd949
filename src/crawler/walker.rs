//! Pagination walker
//!
//! Drives one browser session across up to N linked pages: summarise the
//! current page, find its "next" control, click it, repeat. The walk always
//! yields the pages gathered so far together with the reason it stopped.

use crate::browser::{Session, SessionPool, Timeouts};
use crate::crawler::parser::summarize_document;
use crate::selector::{resolve, AttrMatch, Locator, SelectorCandidate, Strategy, TextRule};
use crate::state::{CrawlSession, PageSnapshot, WalkOutcome, WalkState};
use crate::target::Target;
use crate::{Result, TrawlError};
use scraper::Html;
use tracing::{debug, info, warn};

/// Ways a page may expose its "next page" control, most specific first
pub const NEXT_CONTROL: &[SelectorCandidate] = &[
    SelectorCandidate::new(
        "rel-next",
        Strategy::Attribute {
            tag: "a",
            name: "rel",
            value: AttrMatch::Equals("next"),
        },
    ),
    SelectorCandidate::new(
        "pagination-next",
        Strategy::Class {
            scope: Some("pagination"),
            tag: "",
            class: "next",
        },
    ),
    SelectorCandidate::new(
        "next-page-class",
        Strategy::Class {
            scope: None,
            tag: "",
            class: "next-page",
        },
    ),
    SelectorCandidate::new("next-id", Strategy::Id("next")),
    SelectorCandidate::new(
        "next-text",
        Strategy::Text {
            tag: "a",
            rule: TextRule::Equals(&["next", "next page"]),
        },
    ),
    SelectorCandidate::new(
        "next-text-contains",
        Strategy::Text {
            tag: "a",
            rule: TextRule::Contains("next"),
        },
    ),
];

/// Walks up to `pages` pages starting at `target`
///
/// Fails only when the session cannot be acquired or the first navigation
/// does not settle. Every later breakdown ends the walk as `Failed` and
/// still returns what was gathered.
pub async fn walk(
    pool: &SessionPool,
    target: &Target,
    pages: u32,
    timeouts: &Timeouts,
) -> Result<WalkOutcome> {
    let session = pool.acquire().await?;
    let outcome = drive(&session, target, pages, timeouts).await;
    session.release().await;
    outcome
}

async fn drive(
    session: &Session,
    target: &Target,
    pages: u32,
    timeouts: &Timeouts,
) -> Result<WalkOutcome> {
    info!("Walking up to {} pages from {}", pages, target);

    session
        .navigate(target.as_str(), timeouts.navigation)
        .await
        .map_err(|e| TrawlError::navigation(target.as_str(), timeouts.navigation, e))?;

    let mut crawl = CrawlSession::new(pages);

    while let WalkState::Positioned(page) = crawl.state() {
        let html = match session.content().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to snapshot page {}: {}", page, e);
                crawl.fail();
                break;
            }
        };

        let (snapshot, next) = inspect(&html);
        debug!(
            "Page {}: '{}' ({} chars, {} links)",
            page, snapshot.title, snapshot.text_length, snapshot.links_count
        );
        crawl.record(snapshot);

        if crawl.state().is_terminal() {
            break;
        }

        let Some(locator) = next else {
            info!("No next control on page {}, stopping", page);
            crawl.block();
            break;
        };

        if let Err(e) = session.click(&locator).await {
            warn!("Failed to activate next control on page {}: {}", page, e);
            crawl.fail();
            break;
        }

        if let Err(e) = session.wait_for_navigation(timeouts.navigation).await {
            warn!(
                "Navigation after page {} did not settle ({}), continuing",
                page, e
            );
        }

        crawl.advance();
    }

    let outcome = crawl.finish();
    info!(
        "Walk of {} ended {} after {} of {} pages",
        target,
        outcome.termination,
        outcome.pages.len(),
        outcome.pages_requested
    );
    Ok(outcome)
}

/// Summarises a snapshot and locates its next control
fn inspect(html: &str) -> (PageSnapshot, Option<Locator>) {
    let document = Html::parse_document(html);
    let snapshot = summarize_document(&document);
    let next = resolve(document.root_element(), NEXT_CONTROL).and_then(|m| m.locator);
    (snapshot, next)
}
