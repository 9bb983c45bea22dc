//! Storage traits and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to reset output at {path}: {source}")]
    Reset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write content file {path}: {source}")]
    Content {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to append to index {path}: {source}")]
    Index {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The record kept for every accepted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedPage {
    pub title: String,
    pub url: String,
}

impl AcceptedPage {
    /// Index line for this page: `title:url`, without quoting
    pub fn index_line(&self) -> String {
        format!("{}:{}", self.title, self.url)
    }
}

/// Trait for persistence backends
///
/// Workers of a generation call `save_page` concurrently, so implementations
/// must serialize whatever shared resource they write to.
pub trait PageStore: Send + Sync {
    /// Removes the artifacts of a previous run and prepares empty output
    fn reset(&self) -> StorageResult<()>;

    /// Writes the page's text and appends its index record
    fn save_page(&self, page: &AcceptedPage, text: &str) -> StorageResult<()>;
}
