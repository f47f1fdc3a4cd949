//! Crawler module for page retrieval and pagination
//!
//! This module contains the page-level crawling logic, including:
//! - Raw HTTP fetching for static extraction
//! - Page summaries and link resolution
//! - Walking "next page" controls across a paginated site

mod fetcher;
mod parser;
mod walker;

pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use parser::{resolve_link, summarize_page};
pub use walker::{walk, NEXT_CONTROL};

pub(crate) use parser::body_or_root;
