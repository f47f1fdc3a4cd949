//! Extraction of query matches from static and rendered pages
//!
//! - `static_scan`: raw HTML, every element whose text contains the query
//! - `rendered`: browser-rendered engine result pages, one hit per result

mod rendered;
mod static_scan;

pub use rendered::{extract_rendered, GENERIC_SNIPPET, MISSING_SNIPPET};
pub use static_scan::{extract_static, scan_text, MAX_TEXT_CHARS};

use serde::Serialize;

/// One extracted record
///
/// Serialized without a tag; the field names tell the variants apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractionRecord {
    /// A ranked result on a search engine page
    SearchHit {
        title: String,
        link: String,
        snippet: String,
    },

    /// An element of a static page whose text contains the query
    TextMatch {
        /// Tag name of the matching element
        element: String,
        /// Element text, truncated
        text: String,
        /// Whether the whole text equals the query, ignoring case
        #[serde(rename = "fullMatch")]
        full_match: bool,
    },
}
