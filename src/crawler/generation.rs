//! One generation ("round") of the crawl
//!
//! Every URL in the round's work set gets its own worker. A worker fetches
//! its target, extracts the target's links and examines each link in turn:
//! fetch, parse, filter, and for accepted pages, claim the URL in the visited
//! set and persist the page. Failures end only the step they happen in; they
//! are counted and logged, never retried. The round returns once every worker
//! has finished.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::filter::{RelevanceFilter, Verdict};
use crate::crawler::parser::{extract_links, parse_page};
use crate::output::CrawlStats;
use crate::state::{DoneSet, PageOutcome, RejectReason, VisitedSet};
use crate::storage::{AcceptedPage, PageStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// What one round did
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// Round index, 0 for the seed round
    pub generation: u32,

    /// Workers dispatched (work set minus already dispatched URLs)
    pub targets: usize,

    /// Pages accepted during this round
    pub accepted: u64,

    /// Fetch, parse and persistence failures during this round
    pub failures: u64,

    /// Size of the visited set once the round finished
    pub visited_after: usize,

    /// Wall-clock time from dispatch to the last worker finishing
    pub duration: Duration,
}

/// Runs generations over a shared fetcher, filter and store
///
/// Cloning is cheap; every worker holds its own clone.
#[derive(Clone)]
pub struct CrawlGeneration {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn PageStore>,
    filter: Arc<RelevanceFilter>,
    stats: Arc<CrawlStats>,
    workers: Arc<Semaphore>,
    base_url: Option<Arc<Url>>,
}

impl CrawlGeneration {
    /// # Arguments
    ///
    /// * `fetcher` - Retrieves targets and discovered links
    /// * `store` - Receives accepted pages
    /// * `filter` - Decides which discovered pages are accepted
    /// * `max_workers` - Upper bound on workers running at once (at least 1)
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn PageStore>,
        filter: RelevanceFilter,
        max_workers: usize,
    ) -> Self {
        Self {
            fetcher,
            store,
            filter: Arc::new(filter),
            stats: Arc::new(CrawlStats::new()),
            workers: Arc::new(Semaphore::new(max_workers.max(1))),
            base_url: None,
        }
    }

    /// Resolves every discovered href against `base_url` instead of the page it came from
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(Arc::new(base_url));
        self
    }

    pub fn store(&self) -> &Arc<dyn PageStore> {
        &self.store
    }

    pub fn stats(&self) -> &Arc<CrawlStats> {
        &self.stats
    }

    /// Same fetcher, store, filter and worker pool, counting into fresh statistics
    pub fn with_fresh_stats(&self) -> Self {
        Self {
            stats: Arc::new(CrawlStats::new()),
            ..self.clone()
        }
    }

    /// Runs generation 0 on the seed alone
    ///
    /// The seed is neither marked visited nor done, so a relevant seed that a
    /// later page links back to is still accepted like any other page.
    pub async fn run_seed_round(&self, seed: &str, visited: &Arc<VisitedSet>) -> RoundReport {
        self.dispatch(0, vec![seed.to_string()], visited).await
    }

    /// Runs one round over `work_set`
    ///
    /// URLs already in `done` are skipped; every other URL is marked done and
    /// handed to a worker. Returns after all workers have terminated.
    pub async fn run_round(
        &self,
        generation: u32,
        work_set: &HashSet<String>,
        visited: &Arc<VisitedSet>,
        done: &Arc<DoneSet>,
    ) -> RoundReport {
        let already_done = done.snapshot();
        let targets = work_set
            .difference(&already_done)
            .filter(|target| done.add(target.to_string()))
            .cloned()
            .collect();

        self.dispatch(generation, targets, visited).await
    }

    async fn dispatch(
        &self,
        generation: u32,
        targets: Vec<String>,
        visited: &Arc<VisitedSet>,
    ) -> RoundReport {
        let start = Instant::now();
        let accepted_before = self.stats.count(PageOutcome::Accepted);
        let failures_before = self.stats.failures();

        let mut workers = JoinSet::new();
        for target in targets {
            self.stats.record_target();

            let worker = self.clone();
            let visited = Arc::clone(visited);
            workers.spawn(async move { worker.crawl_target(&target, &visited).await });
        }

        let targets = workers.len();
        tracing::debug!("Generation {}: dispatched {} workers", generation, targets);

        // Barrier: the next round reads `visited`, so nothing may still be writing it
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl worker in generation {} aborted: {}", generation, e);
                self.stats.record_worker_panic();
            }
        }

        RoundReport {
            generation,
            targets,
            accepted: self.stats.count(PageOutcome::Accepted) - accepted_before,
            failures: self.stats.failures() - failures_before,
            visited_after: visited.len(),
            duration: start.elapsed(),
        }
    }

    /// Fetches one target and examines every link on it
    async fn crawl_target(&self, target: &str, visited: &VisitedSet) {
        let Ok(_permit) = self.workers.acquire().await else {
            return;
        };

        let html = match self.fetcher.fetch(target).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Skipping target: {}", e);
                self.stats.record_target_failure();
                return;
            }
        };

        let base_url = match &self.base_url {
            Some(base_url) => Url::clone(base_url),
            None => match Url::parse(target) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Cannot resolve links of {}: {}", target, e);
                    return;
                }
            },
        };

        let links = extract_links(&html, &base_url);
        tracing::debug!("{} links on {}", links.len(), target);
        self.stats.record_links(links.len());

        for link in links {
            let outcome = self.examine_link(&link, visited).await;
            tracing::trace!("{} -> {}", link, outcome);
            self.stats.record(outcome);
        }
    }

    /// Fetch, parse, filter and (on acceptance) persist one discovered link
    async fn examine_link(&self, link: &str, visited: &VisitedSet) -> PageOutcome {
        // Checked before fetching so accepted pages are not downloaded again
        if visited.contains(link) {
            return RejectReason::AlreadyVisited.into();
        }

        let html = match self.fetcher.fetch(link).await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Fetch failed: {}", e);
                return PageOutcome::FetchFailed;
            }
        };

        let page = match parse_page(link, html) {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!("{}", e);
                return PageOutcome::ParseFailed;
            }
        };

        if let Verdict::Reject(reason) = self.filter.evaluate_page(&page, visited) {
            return reason.into();
        }

        // Another worker may have accepted the same URL since the filter ran
        if !visited.add(page.url.clone()) {
            return RejectReason::AlreadyVisited.into();
        }

        let record = AcceptedPage {
            title: page.title,
            url: page.url,
        };
        match self.store.save_page(&record, &page.text) {
            Ok(()) => {
                tracing::info!("Accepted \"{}\" ({})", record.title, record.url);
                PageOutcome::Accepted
            }
            Err(e) => {
                tracing::warn!("Accepted {} but could not save it: {}", record.url, e);
                PageOutcome::PersistFailed
            }
        }
    }
}
