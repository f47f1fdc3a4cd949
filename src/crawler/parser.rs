//! HTML parser for page summaries and link resolution
//!
//! This module handles parsing rendered HTML to extract:
//! - Page title
//! - Visible text length
//! - Link and image counts
//! - Absolute link targets

use crate::state::PageSnapshot;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never reaches the reader
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Summarises a rendered page
///
/// # Summary Rules
///
/// - `title`: trimmed `<title>` text, empty if absent
/// - `text_length`: characters of body text with whitespace runs collapsed,
///   ignoring `script`, `style`, `noscript` and `template` content
/// - `links_count`: every `<a>` element in the document
/// - `images_count`: every `<img>` element in the document
///
/// # Example
///
/// ```
/// use trawl::crawler::summarize_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let snapshot = summarize_page(html);
/// assert_eq!(snapshot.title, "Test");
/// assert_eq!(snapshot.links_count, 1);
/// assert_eq!(snapshot.text_length, 4);
/// ```
pub fn summarize_page(html: &str) -> PageSnapshot {
    summarize_document(&Html::parse_document(html))
}

/// Summarises an already parsed document
pub(crate) fn summarize_document(document: &Html) -> PageSnapshot {
    PageSnapshot {
        title: extract_title(document).unwrap_or_default(),
        text_length: body_text(document).chars().count(),
        links_count: count(document, "a"),
        images_count: count(document, "img"),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn count(document: &Html, css: &str) -> usize {
    Selector::parse(css)
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}

/// The `<body>` element, or the document root when there is none
pub(crate) fn body_or_root(document: &Html) -> ElementRef<'_> {
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Reader-visible body text with whitespace collapsed
fn body_text(document: &Html) -> String {
    let body = body_or_root(document);
    let mut text = String::new();

    for node in body.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_TAGS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}
