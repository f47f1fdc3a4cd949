//! Selector chain resolution
//!
//! Each extraction role ("result title", "next-page link", ...) is described
//! by an ordered chain of [`SelectorCandidate`]s. The resolver tries them in
//! order against a parsed DOM and short-circuits on the first that matches.

mod candidate;
mod resolver;

use scraper::ElementRef;

pub use candidate::{AttrMatch, SelectorCandidate, Strategy, TextRule};
pub use resolver::{resolve, resolve_all, Locator, Match};

/// Flattened, whitespace-collapsed text content of an element
///
/// Approximates the rendered text a reader sees: every text node below the
/// element, runs of whitespace reduced to a single space, trimmed.
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
