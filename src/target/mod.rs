//! Target handling for Trawl
//!
//! A [`Target`] is the normalized absolute URL every operation works against.
//! This module provides normalization of raw user input and host helpers used
//! by engine classification and link filtering.

mod domain;
mod normalize;

use serde::Serialize;
use std::fmt;
use url::Url;

pub use domain::{host_and_port, host_contains};
pub use normalize::normalize_target;

/// A normalized absolute URL
///
/// Invariants: never empty, always carries an `http` or `https` scheme and a
/// host. Only [`normalize_target`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Target(Url);

impl Target {
    pub(crate) fn from_url(url: Url) -> Self {
        Self(url)
    }

    /// Returns the underlying URL
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Returns the target as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the lowercase host of the target
    pub fn host(&self) -> &str {
        // Construction guarantees a host; Url already lowercases it
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
