//! Crawl statistics
//!
//! Workers record every outcome into a shared [`CrawlStats`]; reporting code
//! reads a [`CrawlStatistics`] snapshot of it.

use crate::state::PageOutcome;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free outcome counters shared by all workers of a crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    outcomes: [AtomicU64; PageOutcome::ALL.len()],
    targets_dispatched: AtomicU64,
    target_fetch_failures: AtomicU64,
    links_discovered: AtomicU64,
    worker_panics: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the final outcome of one discovered link
    pub fn record(&self, outcome: PageOutcome) {
        self.outcomes[outcome.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_target(&self) {
        self.targets_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// A crawl target itself could not be fetched, so none of its links were examined
    pub fn record_target_failure(&self) {
        self.target_fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links(&self, count: usize) {
        self.links_discovered
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_worker_panic(&self) {
        self.worker_panics.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, outcome: PageOutcome) -> u64 {
        self.outcomes[outcome.index()].load(Ordering::Relaxed)
    }

    /// Failures of any category, crawl targets included
    pub fn failures(&self) -> u64 {
        PageOutcome::ALL
            .iter()
            .filter(|o| o.is_error())
            .map(|o| self.count(*o))
            .sum::<u64>()
            + self.target_fetch_failures.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CrawlStatistics {
        CrawlStatistics {
            outcomes: PageOutcome::ALL
                .iter()
                .map(|o| (*o, self.count(*o)))
                .collect(),
            targets_dispatched: self.targets_dispatched.load(Ordering::Relaxed),
            target_fetch_failures: self.target_fetch_failures.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            worker_panics: self.worker_panics.load(Ordering::Relaxed),
        }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Count per outcome, in [`PageOutcome::ALL`] order
    pub outcomes: Vec<(PageOutcome, u64)>,

    /// Number of crawl targets workers were dispatched for
    pub targets_dispatched: u64,

    /// Targets whose own fetch failed
    pub target_fetch_failures: u64,

    /// Links found on target pages (deduplicated per page)
    pub links_discovered: u64,

    /// Workers that panicked instead of finishing
    pub worker_panics: u64,
}

impl CrawlStatistics {
    pub fn count(&self, outcome: PageOutcome) -> u64 {
        self.outcomes
            .iter()
            .find(|(o, _)| *o == outcome)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn accepted(&self) -> u64 {
        self.count(PageOutcome::Accepted)
    }

    pub fn rejected(&self) -> u64 {
        self.sum_where(PageOutcome::is_rejection)
    }

    /// Link-level failures plus failed crawl targets
    pub fn errors(&self) -> u64 {
        self.sum_where(PageOutcome::is_error) + self.target_fetch_failures
    }

    fn sum_where(&self, predicate: fn(&PageOutcome) -> bool) -> u64 {
        self.outcomes
            .iter()
            .filter(|(o, _)| predicate(o))
            .map(|(_, count)| count)
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Targets crawled: {}", stats.targets_dispatched);
    println!("  Links discovered: {}", stats.links_discovered);
    println!("  Pages accepted: {}", stats.accepted());
    println!("  Pages rejected: {}", stats.rejected());
    println!("  Errors: {}", stats.errors());
    println!();

    println!("Links by Outcome:");
    let examined: u64 = stats.outcomes.iter().map(|(_, count)| count).sum();
    for (outcome, count) in &stats.outcomes {
        if *count == 0 {
            continue;
        }
        let percentage = if examined > 0 {
            (*count as f64 / examined as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", outcome, count, percentage);
    }
    println!();

    if stats.errors() > 0 {
        println!("Error Summary:");
        if stats.target_fetch_failures > 0 {
            println!("  target_fetch_failed: {}", stats.target_fetch_failures);
        }
        for (outcome, count) in stats.outcomes.iter().filter(|(o, c)| o.is_error() && *c > 0) {
            println!("  {}: {}", outcome, count);
        }
        println!();
    }

    if stats.worker_panics > 0 {
        println!("Worker panics: {}", stats.worker_panics);
    }
}
