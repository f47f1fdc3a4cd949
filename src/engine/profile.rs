//! Known search engine profiles
//!
//! The table is fixed at compile time and shared read-only by every request.
//! Result markup on these engines changes often, so every role is a chain of
//! independent candidates rather than a single selector.

use crate::selector::{AttrMatch, SelectorCandidate, Strategy};

/// Selector chains for pulling results out of a rendered results page
#[derive(Debug, Clone, Copy)]
pub struct ResultSelectors {
    /// Candidates locating each result's container element
    pub containers: &'static [SelectorCandidate],
    /// Candidates locating the title inside a container
    pub title: &'static [SelectorCandidate],
    /// Candidates locating the result link inside a container
    pub link: &'static [SelectorCandidate],
    /// Candidates locating the snippet inside a container
    pub snippet: &'static [SelectorCandidate],
}

/// A recognized search engine
#[derive(Debug, Clone, Copy)]
pub struct EngineProfile {
    /// Short engine name used in logs and payloads
    pub name: &'static str,

    /// Host fragment identifying the engine (`google.com` matches
    /// `www.google.com`)
    pub host: &'static str,

    /// Query URL with a `{query}` placeholder for the encoded query
    pub query_template: &'static str,

    /// Structured result chains; `None` falls back to the generic anchor rule
    pub results: Option<ResultSelectors>,
}

const GOOGLE_CONTAINERS: &[SelectorCandidate] = &[
    SelectorCandidate::new(
        "sokoban-container",
        Strategy::Attribute {
            tag: "div",
            name: "data-sokoban-container",
            value: AttrMatch::Present,
        },
    ),
    SelectorCandidate::new(
        "classic-g",
        Strategy::Class {
            scope: None,
            tag: "div",
            class: "g",
        },
    ),
    SelectorCandidate::new(
        "legacy-rc",
        Strategy::Class {
            scope: None,
            tag: "",
            class: "rc",
        },
    ),
    SelectorCandidate::new(
        "controller-hveid",
        Strategy::Css("[jscontroller][data-hveid]"),
    ),
    SelectorCandidate::new(
        "heading-ancestor",
        Strategy::Ancestor {
            anchor: "a h3",
            closest: "div[style]",
            hops: 2,
        },
    ),
];

const GOOGLE_TITLE: &[SelectorCandidate] = &[
    SelectorCandidate::new("h3", Strategy::Css("h3")),
    SelectorCandidate::new(
        "role-heading",
        Strategy::Attribute {
            tag: "",
            name: "role",
            value: AttrMatch::Equals("heading"),
        },
    ),
    SelectorCandidate::new("anchor-nested-div", Strategy::Css("a > div > div")),
];

const ANCHOR_LINK: &[SelectorCandidate] = &[SelectorCandidate::new(
    "anchor-href",
    Strategy::Attribute {
        tag: "a",
        name: "href",
        value: AttrMatch::Present,
    },
)];

const GOOGLE_SNIPPET: &[SelectorCandidate] = &[
    SelectorCandidate::new(
        "vwic3b",
        Strategy::Class {
            scope: None,
            tag: "div",
            class: "VwiC3b",
        },
    ),
    SelectorCandidate::new(
        "data-sncf",
        Strategy::Attribute {
            tag: "div",
            name: "data-sncf",
            value: AttrMatch::Equals("1"),
        },
    ),
    SelectorCandidate::new(
        "line-clamp",
        Strategy::Attribute {
            tag: "div",
            name: "style",
            value: AttrMatch::Contains("webkit-line-clamp"),
        },
    ),
    SelectorCandidate::new("second-child", Strategy::Css("div > div:nth-child(2)")),
];

const BING_CONTAINERS: &[SelectorCandidate] = &[
    SelectorCandidate::new(
        "b-algo",
        Strategy::Class {
            scope: None,
            tag: "li",
            class: "b_algo",
        },
    ),
    SelectorCandidate::new(
        "heading-ancestor",
        Strategy::Ancestor {
            anchor: "h2 a",
            closest: "li",
            hops: 2,
        },
    ),
];

const BING_TITLE: &[SelectorCandidate] = &[
    SelectorCandidate::new("h2", Strategy::Css("h2")),
    SelectorCandidate::new("h3", Strategy::Css("h3")),
];

const BING_LINK: &[SelectorCandidate] = &[
    SelectorCandidate::new("heading-anchor", Strategy::Css("h2 a[href]")),
    SelectorCandidate::new(
        "anchor-href",
        Strategy::Attribute {
            tag: "a",
            name: "href",
            value: AttrMatch::Present,
        },
    ),
];

const BING_SNIPPET: &[SelectorCandidate] = &[
    SelectorCandidate::new("caption-p", Strategy::Css(".b_caption p")),
    SelectorCandidate::new(
        "line-clamp",
        Strategy::Class {
            scope: None,
            tag: "p",
            class: "b_lineclamp2",
        },
    ),
    SelectorCandidate::new("paragraph", Strategy::Css("p")),
];

const DUCKDUCKGO_CONTAINERS: &[SelectorCandidate] = &[
    SelectorCandidate::new(
        "testid-result",
        Strategy::Attribute {
            tag: "article",
            name: "data-testid",
            value: AttrMatch::Equals("result"),
        },
    ),
    SelectorCandidate::new(
        "html-result",
        Strategy::Class {
            scope: None,
            tag: "div",
            class: "result",
        },
    ),
];

const DUCKDUCKGO_TITLE: &[SelectorCandidate] = &[
    SelectorCandidate::new("h2", Strategy::Css("h2")),
    SelectorCandidate::new(
        "result-title",
        Strategy::Class {
            scope: None,
            tag: "a",
            class: "result__a",
        },
    ),
];

const DUCKDUCKGO_LINK: &[SelectorCandidate] = &[
    SelectorCandidate::new(
        "testid-title-link",
        Strategy::Attribute {
            tag: "a",
            name: "data-testid",
            value: AttrMatch::Equals("result-title-a"),
        },
    ),
    SelectorCandidate::new(
        "result-title",
        Strategy::Class {
            scope: None,
            tag: "a",
            class: "result__a",
        },
    ),
    SelectorCandidate::new(
        "anchor-href",
        Strategy::Attribute {
            tag: "a",
            name: "href",
            value: AttrMatch::Present,
        },
    ),
];

const DUCKDUCKGO_SNIPPET: &[SelectorCandidate] = &[
    SelectorCandidate::new(
        "testid-snippet",
        Strategy::Attribute {
            tag: "div",
            name: "data-result",
            value: AttrMatch::Equals("snippet"),
        },
    ),
    SelectorCandidate::new(
        "result-snippet",
        Strategy::Class {
            scope: None,
            tag: "",
            class: "result__snippet",
        },
    ),
];

/// Every engine the dispatcher recognizes, checked in order
pub static ENGINE_PROFILES: &[EngineProfile] = &[
    EngineProfile {
        name: "google",
        host: "google.com",
        query_template: "https://www.google.com/search?q={query}",
        results: Some(ResultSelectors {
            containers: GOOGLE_CONTAINERS,
            title: GOOGLE_TITLE,
            link: ANCHOR_LINK,
            snippet: GOOGLE_SNIPPET,
        }),
    },
    EngineProfile {
        name: "bing",
        host: "bing.com",
        query_template: "https://www.bing.com/search?q={query}",
        results: Some(ResultSelectors {
            containers: BING_CONTAINERS,
            title: BING_TITLE,
            link: BING_LINK,
            snippet: BING_SNIPPET,
        }),
    },
    EngineProfile {
        name: "duckduckgo",
        host: "duckduckgo.com",
        query_template: "https://duckduckgo.com/?q={query}",
        results: Some(ResultSelectors {
            containers: DUCKDUCKGO_CONTAINERS,
            title: DUCKDUCKGO_TITLE,
            link: DUCKDUCKGO_LINK,
            snippet: DUCKDUCKGO_SNIPPET,
        }),
    },
    EngineProfile {
        name: "yahoo",
        host: "yahoo.com",
        query_template: "https://search.yahoo.com/search?p={query}",
        results: None,
    },
];
