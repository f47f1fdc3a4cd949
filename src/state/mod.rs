//! State module for tracking pagination progress
//!
//! # Components
//!
//! - `WalkState`: position of a pagination walk (positioned on page n, or one of the terminal states)
//! - `Termination`: why a walk ended
//! - `CrawlSession`: transient per-request walk state accumulating `PageSummary` records

mod crawl_session;
mod walk_state;

// Re-export main types
pub use crawl_session::{CrawlSession, PageSnapshot, PageSummary, WalkOutcome};
pub use walk_state::{Termination, WalkState};
