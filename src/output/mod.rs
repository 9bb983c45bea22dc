//! Output module for crawl statistics and summaries
//!
//! This module handles:
//! - Counting per-link outcomes while the crawl runs
//! - Printing final statistics to stdout
//! - Writing an optional markdown summary of the run

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics, CrawlStats};
