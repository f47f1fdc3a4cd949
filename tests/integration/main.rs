//! Integration tests for Trawl
//!
//! Operations are exercised end to end through `Trawler`, with in-memory
//! fetch and browser capabilities standing in for the network.

mod scroll_tests;
mod search_tests;
mod support;
