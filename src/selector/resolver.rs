//! Selector chain resolution
//!
//! Resolution walks a chain top to bottom and stops at the first candidate
//! that yields anything. A miss is an ordinary `None`, never an error; page
//! markup that lacks a role is expected.

use crate::selector::candidate::{SelectorCandidate, Strategy};
use crate::selector::visible_text;
use scraper::{ElementRef, Selector};

/// Address of an element in a live page: the `index`-th match of `css` in
/// document order
///
/// Locators are how a match found in a DOM snapshot gets activated in the
/// browser that produced the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub css: String,
    pub index: usize,
}

/// The first element found by a chain
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub element: ElementRef<'a>,

    /// Name of the candidate that produced the element
    pub candidate: &'static str,

    /// Present when the candidate's strategy is addressable in a live page
    pub locator: Option<Locator>,
}

/// Resolves a chain against `root`, returning the first match
///
/// Candidates are tried in order; later candidates are never consulted once
/// an earlier one matches, even if they would also match.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use trawl::selector::{resolve, AttrMatch, SelectorCandidate, Strategy};
///
/// const CHAIN: &[SelectorCandidate] = &[
///     SelectorCandidate::new("rel-next", Strategy::Attribute {
///         tag: "a",
///         name: "rel",
///         value: AttrMatch::Equals("next"),
///     }),
///     SelectorCandidate::new("id-next", Strategy::Id("next")),
/// ];
///
/// let doc = Html::parse_document(r#"<a id="next">x</a><a rel="next">y</a>"#);
/// let found = resolve(doc.root_element(), CHAIN).unwrap();
/// assert_eq!(found.candidate, "rel-next");
/// ```
pub fn resolve<'a>(root: ElementRef<'a>, chain: &[SelectorCandidate]) -> Option<Match<'a>> {
    let found = chain.iter().find_map(|candidate| first_match(root, candidate));

    match &found {
        Some(m) => tracing::debug!("Selector chain resolved via '{}'", m.candidate),
        None => tracing::debug!("Selector chain of {} candidates found nothing", chain.len()),
    }

    found
}

/// Resolves a chain against `root`, returning every element produced by the
/// first candidate that produces any
///
/// Used where a role occurs many times per page (result containers).
pub fn resolve_all<'a>(
    root: ElementRef<'a>,
    chain: &[SelectorCandidate],
) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
    chain.iter().find_map(|candidate| {
        let elements = all_matches(root, candidate);
        if elements.is_empty() {
            None
        } else {
            tracing::debug!(
                "Selector chain resolved {} elements via '{}'",
                elements.len(),
                candidate.name
            );
            Some((candidate.name, elements))
        }
    })
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Skipping unparseable selector '{}': {:?}", css, e);
            None
        }
    }
}

fn first_match<'a>(root: ElementRef<'a>, candidate: &SelectorCandidate) -> Option<Match<'a>> {
    let css = candidate.strategy.scan_css();
    let selector = parse_selector(&css)?;

    match candidate.strategy {
        Strategy::Ancestor { closest, hops, .. } => {
            let closest = parse_selector(closest)?;
            root.select(&selector)
                .find_map(|el| promote(el, &closest, hops))
                .map(|element| Match {
                    element,
                    candidate: candidate.name,
                    locator: None,
                })
        }
        _ => root
            .select(&selector)
            .enumerate()
            .find(|(_, el)| accepts(&candidate.strategy, *el))
            .map(|(index, element)| Match {
                element,
                candidate: candidate.name,
                locator: Some(Locator {
                    css: css.clone(),
                    index,
                }),
            }),
    }
}

fn all_matches<'a>(root: ElementRef<'a>, candidate: &SelectorCandidate) -> Vec<ElementRef<'a>> {
    let css = candidate.strategy.scan_css();
    let Some(selector) = parse_selector(&css) else {
        return Vec::new();
    };

    match candidate.strategy {
        Strategy::Ancestor { closest, hops, .. } => {
            let Some(closest) = parse_selector(closest) else {
                return Vec::new();
            };
            let mut promoted: Vec<ElementRef<'a>> = Vec::new();
            for el in root.select(&selector) {
                if let Some(ancestor) = promote(el, &closest, hops) {
                    // Sibling anchors often share one container
                    if !promoted.iter().any(|p| p.id() == ancestor.id()) {
                        promoted.push(ancestor);
                    }
                }
            }
            promoted
        }
        _ => root
            .select(&selector)
            .filter(|el| accepts(&candidate.strategy, *el))
            .collect(),
    }
}

fn accepts(strategy: &Strategy, element: ElementRef<'_>) -> bool {
    match strategy {
        Strategy::Text { rule, .. } => rule.accepts(&visible_text(element).to_lowercase()),
        _ => true,
    }
}

fn promote<'a>(element: ElementRef<'a>, closest: &Selector, hops: usize) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| closest.matches(a))
        .or_else(|| {
            element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .nth(hops.saturating_sub(1))
        })
}
