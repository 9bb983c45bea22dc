//! Keyword-Crawler main entry point
//!
//! This is the command-line interface for the keyword crawler.

use anyhow::Context;
use clap::Parser;
use keyword_crawler::config::{load_config_with_hash, validate, Config};
use keyword_crawler::output::{generate_markdown_summary, print_statistics};
use keyword_crawler::CrawlDriver;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Keyword-Crawler: a generational, relevance-filtered web crawler
///
/// Starting from a seed page, every generation fetches the pages accepted in
/// the previous one and keeps the linked pages whose text mentions one of the
/// configured keywords.
#[derive(Parser, Debug)]
#[command(name = "keyword-crawler")]
#[command(version)]
#[command(about = "A generational, keyword-filtered web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start from this URL instead of the configured seed-url
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Run this many generations after the seed round instead of the configured number
    #[arg(long, value_name = "N")]
    generations: Option<u32>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context(format!("loading {}", cli.config.display()));
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("keyword_crawler=info,warn"),
            1 => EnvFilter::new("keyword_crawler=debug,info"),
            2 => EnvFilter::new("keyword_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = &cli.seed {
        tracing::debug!("Seed overridden on the command line: {}", seed);
        config.crawler.seed_url = seed.clone();
    }
    if let Some(generations) = cli.generations {
        config.crawler.generations = generations;
    }
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, config_hash: &str) {
    println!("=== Keyword-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!(
        "  Base URL: {}",
        config
            .crawler
            .base_url
            .as_deref()
            .unwrap_or("(each page's own URL)")
    );
    println!("  Generations after seed: {}", config.crawler.generations);
    println!(
        "  Max concurrent workers: {}",
        config.crawler.max_concurrent_workers
    );
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nFilter:");
    println!("  Keywords: {}", config.filter.keywords.join(", "));
    println!(
        "  Exclusion words: {}",
        config.filter.exclusion_words.join(", ")
    );
    println!("  Word window: {}", config.filter.word_window);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Index: {}", config.output.index_path);
    println!("  Content directory: {}", config.output.content_dir);
    if let Some(summary_path) = &config.output.summary_path {
        println!("  Summary: {}", summary_path);
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling from {} for {} generations with up to {} workers",
        config.crawler.seed_url,
        config.crawler.generations,
        config.crawler.max_concurrent_workers
    );

    let driver = CrawlDriver::from_config(config).context("failed to set up crawler")?;

    let report = match driver
        .run(&config.crawler.seed_url, config.crawler.generations)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_statistics(&report.statistics);

    if let Some(summary_path) = &config.output.summary_path {
        generate_markdown_summary(&report, Path::new(summary_path))
            .with_context(|| format!("failed to write summary to {}", summary_path))?;
        println!("✓ Summary written to: {}", summary_path);
    }

    Ok(())
}
