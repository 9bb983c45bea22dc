//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! driver, real HTTP fetcher and file store included, end-to-end.

use keyword_crawler::config::{Config, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig};
use keyword_crawler::output::generate_markdown_summary;
use keyword_crawler::state::{PageOutcome, RejectReason};
use keyword_crawler::{CrawlDriver, CrawlError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing its output below `output_dir`
fn create_test_config(seed_url: &str, generations: u32, output_dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            base_url: None,
            generations,
            max_concurrent_workers: 4,
            fetch_timeout_secs: 5,
        },
        filter: FilterConfig {
            keywords: vec!["malware".to_string()],
            exclusion_words: vec!["Template".to_string()],
            word_window: 200,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            index_path: output_dir.join("urls.csv").display().to_string(),
            content_dir: output_dir.join("text").display().to_string(),
            summary_path: None,
        },
    }
}

/// Serves an HTML page with the given title, body text and outgoing links
async fn mount_page(server: &MockServer, route: &str, title: &str, body: &str, links: &[String]) {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    "<html><head><title>{}</title></head><body><p>{}</p>{}</body></html>",
                    title, body, anchors
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn index_lines(output_dir: &Path) -> Vec<String> {
    fs::read_to_string(output_dir.join("urls.csv"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn content_files(output_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(output_dir.join("text"))
        .expect("content directory exists")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_seed_round_accepts_only_relevant_page() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        "Seed",
        "start here",
        &[format!("{}/a", base), format!("{}/b", base), format!("{}/c", base)],
    )
    .await;
    mount_page(&server, "/a", "Malware T1587", "Adversaries may develop malware", &[]).await;
    mount_page(&server, "/b", "Phishing", "Adversaries may send phishing messages", &[]).await;
    mount_page(&server, "/c", "Botnets", "Adversaries may buy a botnet", &[]).await;

    let seed = format!("{}/", base);
    let config = create_test_config(&seed, 0, output.path());
    let report = CrawlDriver::from_config(&config)
        .unwrap()
        .run(&seed, 0)
        .await
        .unwrap();

    assert_eq!(report.accepted_pages(), 1);
    assert_eq!(
        index_lines(output.path()),
        vec![format!("Malware T1587:{}/a", base)]
    );
    assert_eq!(content_files(output.path()), vec!["Malware T1587.txt"]);

    let text = fs::read_to_string(output.path().join("text").join("Malware T1587.txt")).unwrap();
    assert!(text.contains("Adversaries may develop malware"));
    assert_eq!(report.statistics.count(RejectReason::MissingKeyword.into()), 2);
}

#[tokio::test]
async fn test_excluded_and_non_ascii_titles_are_rejected() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        "Seed",
        "start here",
        &[format!("{}/template", base), format!("{}/umlaut", base)],
    )
    .await;
    mount_page(&server, "/template", "Template:Malware", "all about malware", &[]).await;
    mount_page(&server, "/umlaut", "Malwäre", "all about malware", &[]).await;

    let seed = format!("{}/", base);
    let config = create_test_config(&seed, 1, output.path());
    let report = CrawlDriver::from_config(&config)
        .unwrap()
        .run(&seed, 1)
        .await
        .unwrap();

    assert_eq!(report.accepted_pages(), 0);
    assert!(index_lines(output.path()).is_empty());
    assert!(content_files(output.path()).is_empty());
    assert_eq!(report.statistics.count(RejectReason::ExcludedTitle.into()), 1);
    assert_eq!(report.statistics.count(RejectReason::NonAsciiTitle.into()), 1);
}

#[tokio::test]
async fn test_zero_generations_visits_only_pages_accepted_from_seed() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", "Seed", "start", &[format!("{}/first", base)]).await;
    mount_page(
        &server,
        "/first",
        "Malware First",
        "malware",
        &[format!("{}/second", base)],
    )
    .await;
    mount_page(&server, "/second", "Malware Second", "malware", &[]).await;

    let seed = format!("{}/", base);
    let config = create_test_config(&seed, 0, output.path());
    let report = CrawlDriver::from_config(&config)
        .unwrap()
        .run(&seed, 0)
        .await
        .unwrap();

    let mut visited: Vec<_> = report.visited.into_iter().collect();
    visited.sort();
    assert_eq!(visited, vec![format!("{}/first", base)]);
    assert!(report.done.is_empty());

    // The next generation would pick up the second page
    let report = CrawlDriver::from_config(&config)
        .unwrap()
        .run(&seed, 1)
        .await
        .unwrap();
    assert!(report.visited.contains(&format!("{}/second", base)));
    assert_eq!(index_lines(output.path()).len(), 2);
}

#[tokio::test]
async fn test_page_discovered_twice_in_one_round_is_saved_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        "Seed",
        "start",
        &[format!("{}/one", base), format!("{}/two", base)],
    )
    .await;
    mount_page(&server, "/one", "Malware One", "malware", &[format!("{}/shared", base)]).await;
    mount_page(&server, "/two", "Malware Two", "malware", &[format!("{}/shared", base)]).await;
    mount_page(&server, "/shared", "Malware Shared", "malware", &[]).await;

    let seed = format!("{}/", base);
    let config = create_test_config(&seed, 1, output.path());
    let report = CrawlDriver::from_config(&config)
        .unwrap()
        .run(&seed, 1)
        .await
        .unwrap();

    let shared = format!("{}/shared", base);
    assert!(report.visited.contains(&shared));
    assert_eq!(report.rounds[1].targets, 2);
    assert_eq!(report.rounds[1].accepted, 1);

    let lines = index_lines(output.path());
    assert_eq!(lines.iter().filter(|l| l.ends_with(&shared)).count(), 1);
    assert_eq!(lines.len(), 3);
    assert_eq!(
        content_files(output.path()),
        vec!["Malware One.txt", "Malware Shared.txt", "Malware Two.txt"]
    );
    assert!(report.done.is_subset(&report.visited));
}

#[tokio::test]
async fn test_dead_links_are_counted_not_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        "Seed",
        "start",
        &[format!("{}/missing", base), format!("{}/good", base)],
    )
    .await;
    mount_page(&server, "/good", "Malware Good", "malware", &[]).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let config = create_test_config(&seed, 0, output.path());
    let report = CrawlDriver::from_config(&config)
        .unwrap()
        .run(&seed, 0)
        .await
        .unwrap();

    assert_eq!(report.statistics.count(PageOutcome::FetchFailed), 1);
    assert_eq!(report.statistics.accepted(), 1);
    assert_eq!(report.rounds[0].failures, 1);
}

#[tokio::test]
async fn test_markdown_summary_is_written() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", "Seed", "start", &[format!("{}/a", base)]).await;
    mount_page(&server, "/a", "Malware A", "malware", &[]).await;

    let seed = format!("{}/", base);
    let config = create_test_config(&seed, 2, output.path());
    let report = CrawlDriver::from_config(&config)
        .unwrap()
        .run(&seed, 2)
        .await
        .unwrap();

    let summary_path = output.path().join("summary.md");
    generate_markdown_summary(&report, &summary_path).unwrap();

    let summary = fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains(&format!("- **Seed**: {}", seed)));
    assert!(summary.contains("- **Generations**: 2 after the seed round"));
    assert!(summary.contains("| accepted | 1 |"));
}

#[test]
fn test_invalid_config_is_rejected_before_crawling() {
    let output = TempDir::new().unwrap();
    let mut config = create_test_config("http://127.0.0.1:1/", 0, output.path());
    config.crawler.max_concurrent_workers = 0;

    assert!(matches!(
        CrawlDriver::from_config(&config),
        Err(CrawlError::Config(_))
    ));
}
