//! Thread-safe URL sets shared by the workers of a generation

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// A monotonically growing set of URLs
///
/// Every operation takes the same lock, so a membership test can never
/// interleave with a half-finished insert. URLs are compared as exact
/// strings; no normalization is applied.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

/// URLs already dispatched as crawl targets.
///
/// Same primitive as [`VisitedSet`]; the driver keeps `DoneSet ⊆ VisitedSet`.
pub type DoneSet = VisitedSet;

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the URL has been added
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Inserts a URL, returning true only for the caller that inserted it first
    pub fn add(&self, url: impl Into<String>) -> bool {
        self.lock().insert(url.into())
    }

    /// Point-in-time copy, safe to iterate while other workers keep adding
    pub fn snapshot(&self) -> HashSet<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panicking worker cannot leave the set half-updated: HashSet
        // operations either complete or never start.
        self.urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: Into<String>> FromIterator<S> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            urls: Mutex::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_add_is_idempotent() {
        let set = VisitedSet::new();
        assert!(set.add("https://example.com/a"));
        assert!(!set.add("https://example.com/a"));
        assert!(set.contains("https://example.com/a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_exact_string_equality() {
        let set = VisitedSet::new();
        set.add("https://example.com/a");
        assert!(!set.contains("https://example.com/a/"));
        assert!(!set.contains("https://EXAMPLE.com/a"));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let set = VisitedSet::new();
        set.add("https://example.com/a");
        let snapshot = set.snapshot();
        set.add("https://example.com/b");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_iterator() {
        let set: VisitedSet = ["https://example.com/a", "https://example.com/b"]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_concurrent_adds_have_single_winner() {
        let set = Arc::new(VisitedSet::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|i| set.add(format!("https://example.com/{}", i)))
                        .count()
                })
            })
            .collect();

        let winners: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(winners, 100);
        assert_eq!(set.len(), 100);
    }

    #[test]
    fn test_snapshot_never_shrinks_while_writers_run() {
        let set = Arc::new(VisitedSet::new());
        let writer = {
            let set = Arc::clone(&set);
            std::thread::spawn(move || {
                for i in 0..1000 {
                    set.add(format!("https://example.com/{}", i));
                }
            })
        };

        let mut last = 0;
        while !writer.is_finished() {
            let size = set.snapshot().len();
            assert!(size >= last);
            last = size;
        }
        writer.join().unwrap();
        assert_eq!(set.snapshot().len(), 1000);
    }
}
