//! Selector candidate definitions
//!
//! A candidate is a named strategy for locating one DOM role. Strategies form a
//! closed set so that chains can be declared as `const` tables and inspected
//! in tests.

/// How an attribute value must match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatch {
    /// The attribute only has to be present
    Present,
    /// The attribute value must equal the given string
    Equals(&'static str),
    /// The attribute value must contain the given string
    Contains(&'static str),
}

/// Text-content heuristic applied after the element scan
///
/// Text is whitespace-collapsed, trimmed and lowercased before the rule runs;
/// needles are expected in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    /// Text equals one of the given strings
    Equals(&'static [&'static str]),
    /// Text contains the given string
    Contains(&'static str),
    /// Text is longer than the given number of characters
    LongerThan(usize),
}

impl TextRule {
    /// Returns true if normalized `text` satisfies the rule
    pub fn accepts(&self, text: &str) -> bool {
        match self {
            Self::Equals(options) => options.iter().any(|o| *o == text),
            Self::Contains(needle) => text.contains(needle),
            Self::LongerThan(n) => text.chars().count() > *n,
        }
    }
}

/// A strategy for locating elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Elements of `tag` (empty for any tag) with a matching attribute
    Attribute {
        tag: &'static str,
        name: &'static str,
        value: AttrMatch,
    },

    /// Elements of `tag` (empty for any) carrying `class`, optionally nested
    /// under an element carrying the `scope` class
    Class {
        scope: Option<&'static str>,
        tag: &'static str,
        class: &'static str,
    },

    /// The element with the given id
    Id(&'static str),

    /// A raw CSS selector for structure the other variants cannot express
    Css(&'static str),

    /// Elements matching `tag` (a tag name or simple selector) whose text
    /// satisfies `rule`
    Text { tag: &'static str, rule: TextRule },

    /// Elements matching `anchor`, each promoted to its closest ancestor
    /// matching `closest`, or failing that to its `hops`-th ancestor
    Ancestor {
        anchor: &'static str,
        closest: &'static str,
        hops: usize,
    },
}

impl Strategy {
    /// CSS selector used to scan for raw candidates before any text filter or
    /// ancestor promotion
    pub fn scan_css(&self) -> String {
        match self {
            Self::Attribute { tag, name, value } => match value {
                AttrMatch::Present => format!("{}[{}]", tag, name),
                AttrMatch::Equals(v) => format!("{}[{}=\"{}\"]", tag, name, v),
                AttrMatch::Contains(v) => format!("{}[{}*=\"{}\"]", tag, name, v),
            },
            Self::Class { scope, tag, class } => match scope {
                Some(scope) => format!(".{} {}.{}", scope, tag, class),
                None => format!("{}.{}", tag, class),
            },
            Self::Id(id) => format!("#{}", id),
            Self::Css(css) => (*css).to_string(),
            Self::Text { tag, .. } => (*tag).to_string(),
            Self::Ancestor { anchor, .. } => (*anchor).to_string(),
        }
    }
}

/// A named, ordered entry in a selector chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorCandidate {
    /// Short name used in logs and test assertions
    pub name: &'static str,
    pub strategy: Strategy,
}

impl SelectorCandidate {
    pub const fn new(name: &'static str, strategy: Strategy) -> Self {
        Self { name, strategy }
    }
}
