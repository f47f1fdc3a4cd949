//! Per-request pagination state
//!
//! A `CrawlSession` lives for exactly one Scroll request. It owns the
//! summaries gathered so far and enforces the walk's state transitions.

use crate::state::walk_state::{Termination, WalkState};
use serde::Serialize;

/// Facts captured from one rendered page, before it is numbered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSnapshot {
    pub title: String,
    pub text_length: usize,
    pub links_count: usize,
    pub images_count: usize,
}

/// Summary of one page of a walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// 1-based position in the walk
    pub page: u32,
    pub title: String,
    pub text_length: usize,
    pub links_count: usize,
    pub images_count: usize,
}

/// Final result of a walk: always carries whatever was gathered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOutcome {
    pub pages_requested: u32,
    pub pages: Vec<PageSummary>,
    pub termination: Termination,
}

/// Transient state of one pagination run
#[derive(Debug)]
pub struct CrawlSession {
    requested: u32,
    state: WalkState,
    pages: Vec<PageSummary>,
}

impl CrawlSession {
    /// Creates a session positioned on page 1
    ///
    /// A request for zero pages is treated as a request for one.
    pub fn new(requested: u32) -> Self {
        let requested = requested.max(1);
        Self {
            requested,
            state: WalkState::Positioned(1),
            pages: Vec::with_capacity(requested.min(64) as usize),
        }
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn requested(&self) -> u32 {
        self.requested
    }

    pub fn pages(&self) -> &[PageSummary] {
        &self.pages
    }

    /// Records the summary of the current page
    ///
    /// Moves to `Exhausted` once the requested count has been summarised.
    /// Ignored in terminal states.
    pub fn record(&mut self, snapshot: PageSnapshot) {
        let WalkState::Positioned(page) = self.state else {
            tracing::warn!("Ignoring page summary recorded in state {}", self.state);
            return;
        };

        self.pages.push(PageSummary {
            page,
            title: snapshot.title,
            text_length: snapshot.text_length,
            links_count: snapshot.links_count,
            images_count: snapshot.images_count,
        });

        if page >= self.requested {
            self.state = WalkState::Exhausted;
        }
    }

    /// Moves from `Positioned(n)` to `Positioned(n + 1)`
    ///
    /// Only valid once page `n` has been recorded; otherwise ignored.
    pub fn advance(&mut self) {
        match self.state {
            WalkState::Positioned(n) if self.pages.len() as u32 == n => {
                self.state = WalkState::Positioned(n + 1);
            }
            other => tracing::warn!("Ignoring advance in state {}", other),
        }
    }

    /// Ends the walk because no next control exists
    pub fn block(&mut self) {
        if !self.state.is_terminal() {
            self.state = WalkState::Blocked;
        }
    }

    /// Ends the walk because navigation broke down
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = WalkState::Failed;
        }
    }

    /// Consumes the session into its outcome
    ///
    /// A session finished while still positioned counts as failed.
    pub fn finish(self) -> WalkOutcome {
        WalkOutcome {
            pages_requested: self.requested,
            termination: self.state.termination().unwrap_or(Termination::Failed),
            pages: self.pages,
        }
    }
}
