use crate::engine::profile::{EngineProfile, ENGINE_PROFILES};
use crate::target::{host_contains, normalize_target, Target};
use crate::TargetResult;
use std::fmt;

/// Outcome of classifying a target
#[derive(Debug, Clone, Copy)]
pub enum Dispatch {
    /// A recognized search engine; queries go through a rendered browser
    Engine(&'static EngineProfile),
    /// Any other site; queries scan the static HTML
    Generic,
}

impl Dispatch {
    /// Returns the engine profile if the target is a recognized engine
    pub fn engine(&self) -> Option<&'static EngineProfile> {
        match *self {
            Self::Engine(profile) => Some(profile),
            Self::Generic => None,
        }
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(profile) => write!(f, "engine:{}", profile.name),
            Self::Generic => f.write_str("generic"),
        }
    }
}

/// Classifies a target as a known search engine or a generic site
///
/// Classification is a case-insensitive substring test of the target's host
/// against each profile's host fragment, in table order. It depends on
/// nothing but the target.
///
/// # Examples
///
/// ```
/// use trawl::engine::classify;
/// use trawl::target::normalize_target;
///
/// let google = normalize_target("https://www.google.com/webhp").unwrap();
/// assert_eq!(classify(&google).engine().map(|p| p.name), Some("google"));
///
/// let plain = normalize_target("example.com").unwrap();
/// assert!(classify(&plain).engine().is_none());
/// ```
pub fn classify(target: &Target) -> Dispatch {
    let host = target.host();
    ENGINE_PROFILES
        .iter()
        .find(|profile| host_contains(host, profile.host))
        .map_or(Dispatch::Generic, Dispatch::Engine)
}

/// Builds the engine-specific query URL for `query`
///
/// The query is percent-encoded the way `encodeURIComponent` encodes it, so
/// spaces become `%20` and reserved characters are escaped.
pub fn query_url(profile: &EngineProfile, query: &str) -> TargetResult<Target> {
    let encoded = urlencoding::encode(query);
    normalize_target(&profile.query_template.replace("{query}", &encoded))
}
