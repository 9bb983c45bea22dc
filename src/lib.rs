//! Keyword-Crawler: a generational, relevance-filtered web crawler
//!
//! Starting from a seed page, the crawler follows links in synchronous
//! "generations". Every discovered page is run through a keyword filter and
//! the pages that pass are written to disk and become the crawl targets of
//! the next generation.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Errors that end a crawl before it starts
///
/// Failures while crawling individual pages never surface here; they are
/// counted per category in the crawl statistics.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failures while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Connect { url }
            | Self::Http { url, .. } => url,
        }
    }
}

/// Failures while turning fetched HTML into a page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Page has no title: {url}")]
    MissingTitle { url: String },
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlDriver, CrawlGeneration, Fetcher, HttpFetcher, RelevanceFilter};
pub use state::{DoneSet, VisitedSet};
pub use storage::{FileStore, PageStore};
