//! Engine query dispatch
//!
//! Decides whether a target is a known search engine (rendered through a
//! browser with engine-specific selector chains) or a generic site (scanned
//! as static HTML), and builds engine query URLs.

mod dispatch;
mod profile;

pub use dispatch::{classify, query_url, Dispatch};
pub use profile::{EngineProfile, ResultSelectors, ENGINE_PROFILES};
