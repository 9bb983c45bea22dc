//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet` / `DoneSet`: the shared, lock-guarded URL sets every worker reads and grows
//! - `PageOutcome`: what happened to a single discovered link (accepted, rejected, failed)

mod outcome;
mod visited;

// Re-export main types
pub use outcome::{PageOutcome, RejectReason};
pub use visited::{DoneSet, VisitedSet};
