//! Outcome definitions for pages examined during a generation
//!
//! Every discovered link ends in exactly one of these outcomes, which is what
//! the statistics layer counts.
use std::fmt;

/// Why the relevance filter turned a page down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// URL was already accepted earlier (or by a concurrent worker)
    AlreadyVisited,

    /// Title contains a non-ASCII character
    NonAsciiTitle,

    /// None of the keywords appears in the leading words of the page
    MissingKeyword,

    /// Title contains an exclusion word
    ExcludedTitle,
}

/// Final outcome of examining one discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Success =====
    /// Page passed the filter and was written to storage
    Accepted,

    // ===== Filter Rejections =====
    /// Page was fetched but rejected by the relevance filter
    Rejected(RejectReason),

    // ===== Errors =====
    /// Network, timeout or HTTP status failure
    FetchFailed,

    /// HTML could not be turned into a page (no title)
    ParseFailed,

    /// Page was accepted but writing it to storage failed
    PersistFailed,
}

impl PageOutcome {
    /// Every outcome, in reporting order
    pub const ALL: [PageOutcome; 8] = [
        Self::Accepted,
        Self::Rejected(RejectReason::AlreadyVisited),
        Self::Rejected(RejectReason::NonAsciiTitle),
        Self::Rejected(RejectReason::MissingKeyword),
        Self::Rejected(RejectReason::ExcludedTitle),
        Self::FetchFailed,
        Self::ParseFailed,
        Self::PersistFailed,
    ];

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns true if this outcome was caused by a failure rather than a decision
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed | Self::ParseFailed | Self::PersistFailed
        )
    }

    /// Stable snake_case name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected(RejectReason::AlreadyVisited) => "already_visited",
            Self::Rejected(RejectReason::NonAsciiTitle) => "non_ascii_title",
            Self::Rejected(RejectReason::MissingKeyword) => "missing_keyword",
            Self::Rejected(RejectReason::ExcludedTitle) => "excluded_title",
            Self::FetchFailed => "fetch_failed",
            Self::ParseFailed => "parse_failed",
            Self::PersistFailed => "persist_failed",
        }
    }

    /// Position of this outcome in [`PageOutcome::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Self::Accepted => 0,
            Self::Rejected(RejectReason::AlreadyVisited) => 1,
            Self::Rejected(RejectReason::NonAsciiTitle) => 2,
            Self::Rejected(RejectReason::MissingKeyword) => 3,
            Self::Rejected(RejectReason::ExcludedTitle) => 4,
            Self::FetchFailed => 5,
            Self::ParseFailed => 6,
            Self::PersistFailed => 7,
        }
    }
}

impl From<RejectReason> for PageOutcome {
    fn from(reason: RejectReason) -> Self {
        Self::Rejected(reason)
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
