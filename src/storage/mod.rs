//! Storage module for persisting accepted pages
//!
//! This module handles:
//! - Clearing the artifacts of a previous run
//! - Writing each accepted page's text to its own file
//! - Appending accepted pages to the index file

mod files;
mod traits;

pub use files::{sanitize_title, FileStore};
pub use traits::{AcceptedPage, PageStore, StorageError, StorageResult};
