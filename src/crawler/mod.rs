//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing and link extraction
//! - The relevance filter deciding which pages are kept
//! - Generation rounds and the driver running them

mod driver;
mod fetcher;
mod filter;
mod generation;
mod parser;

pub use driver::{CrawlDriver, CrawlReport};
pub use fetcher::{build_http_client, user_agent_string, Fetcher, HttpFetcher};
pub use filter::{RelevanceFilter, Verdict};
pub use generation::{CrawlGeneration, RoundReport};
pub use parser::{extract_links, parse_page, Page};
