//! Text scan over raw (unrendered) HTML

use crate::crawler::{body_or_root, PageFetcher};
use crate::extract::ExtractionRecord;
use crate::target::Target;
use crate::{Result, TrawlError};
use scraper::{ElementRef, Html};
use tracing::{debug, info};

/// Characters of element text kept in a record before truncation
pub const MAX_TEXT_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Fetches `target` and reports every element whose text contains `query`
///
/// Fetch failures propagate as `TrawlError::Fetch` and are not retried.
pub async fn extract_static(
    fetcher: &dyn PageFetcher,
    target: &Target,
    query: &str,
) -> Result<Vec<ExtractionRecord>> {
    info!("Static scan of {} for '{}'", target, query);

    let html = fetcher
        .fetch(target.url())
        .await
        .map_err(|source| TrawlError::Fetch {
            url: target.to_string(),
            source,
        })?;

    let records = scan_text(&html, query);
    debug!("Static scan of {} matched {} elements", target, records.len());
    Ok(records)
}

/// Scans every element below `<body>` in document order
///
/// Matching ignores case. A parent and its child both produce a record when
/// both contain the query.
///
/// # Example
///
/// ```
/// use trawl::extract::scan_text;
///
/// let records = scan_text("<body><p>Blue widget</p></body>", "WIDGET");
/// assert_eq!(records.len(), 1);
/// ```
pub fn scan_text(html: &str, query: &str) -> Vec<ExtractionRecord> {
    let document = Html::parse_document(html);
    let root = body_or_root(&document);
    let needle = query.to_lowercase();

    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let text = element.text().collect::<String>();
            let text = text.trim();
            let folded = text.to_lowercase();
            if !folded.contains(&needle) {
                return None;
            }
            Some(ExtractionRecord::TextMatch {
                element: element.value().name().to_string(),
                text: truncate(text),
                full_match: folded == needle,
            })
        })
        .collect()
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
