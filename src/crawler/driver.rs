//! Crawl driver: the seed round followed by a fixed number of generations

use crate::config::{validate, Config};
use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::filter::RelevanceFilter;
use crate::crawler::generation::{CrawlGeneration, RoundReport};
use crate::output::CrawlStatistics;
use crate::state::{DoneSet, VisitedSet};
use crate::storage::FileStore;
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Everything a finished crawl produced besides the files on disk
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed_url: String,

    /// One entry per round, the seed round first
    pub rounds: Vec<RoundReport>,

    /// Final visited set: every accepted page
    pub visited: HashSet<String>,

    /// URLs a worker was dispatched for
    pub done: HashSet<String>,

    pub statistics: CrawlStatistics,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_duration: Duration,
}

impl CrawlReport {
    /// Pages accepted and written to storage over the whole run
    pub fn accepted_pages(&self) -> u64 {
        self.statistics.accepted()
    }
}

/// Runs a crawl from a seed URL for a fixed number of generations
pub struct CrawlDriver {
    generation: CrawlGeneration,
}

impl CrawlDriver {
    pub fn new(generation: CrawlGeneration) -> Self {
        Self { generation }
    }

    /// Wires the HTTP fetcher, file store and filter described by `config`
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        validate(config)?;

        let fetcher = HttpFetcher::from_config(config)?;
        let store = FileStore::from_config(&config.output);
        let filter = RelevanceFilter::from_config(&config.filter);

        let mut generation = CrawlGeneration::new(
            Arc::new(fetcher),
            Arc::new(store),
            filter,
            config.crawler.max_concurrent_workers as usize,
        );
        if let Some(base_url) = &config.crawler.base_url {
            generation = generation.with_base_url(Url::parse(base_url)?);
        }

        Ok(Self::new(generation))
    }

    /// Runs the seed round and then `generations` further rounds
    ///
    /// Output from any previous run is deleted first. The seed is crawled
    /// without going through the filter and is not marked visited or done;
    /// it is persisted only if a later page links back to it and it passes
    /// the filter then. Statistics start from zero on every call.
    ///
    /// # Errors
    ///
    /// Only an unparseable seed URL or a failed output reset end the run;
    /// per-page failures are counted in the report instead.
    pub async fn run(&self, seed_url: &str, generations: u32) -> Result<CrawlReport, CrawlError> {
        let seed = Url::parse(seed_url)?.to_string();

        self.generation.store().reset()?;
        let generation = self.generation.with_fresh_stats();

        let started_at = Utc::now();
        let start = Instant::now();
        let visited = Arc::new(VisitedSet::new());
        let done = Arc::new(DoneSet::new());
        let mut rounds = Vec::with_capacity(generations as usize + 1);

        let report = generation.run_seed_round(&seed, &visited).await;
        log_round(&report);
        rounds.push(report);

        for index in 1..=generations {
            let work: HashSet<String> = visited
                .snapshot()
                .difference(&done.snapshot())
                .cloned()
                .collect();

            let report = generation.run_round(index, &work, &visited, &done).await;
            log_round(&report);
            rounds.push(report);

            debug_assert!(done.snapshot().is_subset(&visited.snapshot()));
        }

        let statistics = generation.stats().snapshot();
        tracing::info!(
            "Crawl finished: {} pages accepted in {} rounds ({:.1}s)",
            statistics.accepted(),
            rounds.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(CrawlReport {
            seed_url: seed,
            rounds,
            visited: visited.snapshot(),
            done: done.snapshot(),
            statistics,
            started_at,
            finished_at: Utc::now(),
            total_duration: start.elapsed(),
        })
    }
}

fn log_round(report: &RoundReport) {
    tracing::info!(
        "Generation {} done in {:.2}s: {} targets, {} accepted, {} failures, {} visited",
        report.generation,
        report.duration.as_secs_f64(),
        report.targets,
        report.accepted,
        report.failures,
        report.visited_after
    );
}
