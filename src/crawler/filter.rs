//! Relevance filter deciding which discovered pages are kept
//!
//! Rules are applied in order and the first failing rule decides:
//!
//! | Rule | Rejects when |
//! |------|--------------|
//! | 1 | the URL is already in the visited set |
//! | 2 | the title contains a non-ASCII character |
//! | 3 | no keyword appears among the first `word_window` words of the page text (lower-cased) |
//! | 4 | an exclusion word appears as a whole word in the title (case-sensitive, `:` treated as a space) |

use crate::config::FilterConfig;
use crate::crawler::parser::Page;
use crate::state::{RejectReason, VisitedSet};
use std::collections::HashSet;

/// Result of running a page through the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Keyword and exclusion-word filter
///
/// Holds no mutable state, so one instance is shared by every worker.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: HashSet<String>,
    exclusion_words: HashSet<String>,
    word_window: usize,
}

impl RelevanceFilter {
    /// Creates a filter; keywords are lower-cased, exclusion words kept as given
    pub fn new<K, E>(keywords: K, exclusion_words: E, word_window: usize) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            exclusion_words: exclusion_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_string())
                .filter(|w| !w.is_empty())
                .collect(),
            word_window,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(&config.keywords, &config.exclusion_words, config.word_window)
    }

    /// Runs all four rules against a page's URL, title and visible text
    pub fn evaluate(&self, url: &str, title: &str, text: &str, visited: &VisitedSet) -> Verdict {
        if visited.contains(url) {
            return Verdict::Reject(RejectReason::AlreadyVisited);
        }

        if !title.is_ascii() {
            return Verdict::Reject(RejectReason::NonAsciiTitle);
        }

        if !self.has_keyword(text) {
            return Verdict::Reject(RejectReason::MissingKeyword);
        }

        if self.has_exclusion_word(title) {
            return Verdict::Reject(RejectReason::ExcludedTitle);
        }

        Verdict::Accept
    }

    pub fn evaluate_page(&self, page: &Page, visited: &VisitedSet) -> Verdict {
        self.evaluate(&page.url, &page.title, &page.text, visited)
    }

    /// Convenience form of [`evaluate_page`](Self::evaluate_page)
    pub fn accept(&self, page: &Page, visited: &VisitedSet) -> bool {
        self.evaluate_page(page, visited).is_accept()
    }

    fn has_keyword(&self, text: &str) -> bool {
        text.split_whitespace()
            .take(self.word_window)
            .any(|word| self.keywords.contains(&word.to_lowercase()))
    }

    fn has_exclusion_word(&self, title: &str) -> bool {
        title
            .replace(':', " ")
            .split_whitespace()
            .any(|word| self.exclusion_words.contains(word))
    }
}
