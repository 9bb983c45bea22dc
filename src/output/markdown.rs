//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a finished
//! crawl: run timing, one table row per generation and the outcome counters.

use crate::crawler::CrawlReport;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes the markdown summary of `report` to `output_path`
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> io::Result<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let stats = &report.statistics;
    let mut md = String::new();

    md.push_str("# Keyword Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed_url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    let seconds = report.total_duration.as_secs_f64();
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds ({:.2} minutes)\n",
        seconds,
        seconds / 60.0
    ));
    md.push_str(&format!(
        "- **Generations**: {} after the seed round\n\n",
        report.rounds.len().saturating_sub(1)
    ));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Accepted**: {}\n", report.accepted_pages()));
    md.push_str(&format!("- **Targets Crawled**: {}\n", stats.targets_dispatched));
    md.push_str(&format!("- **Links Discovered**: {}\n", stats.links_discovered));
    md.push_str(&format!("- **Pages Rejected**: {}\n", stats.rejected()));
    md.push_str(&format!("- **Errors**: {}\n\n", stats.errors()));

    md.push_str("## Generations\n\n");
    md.push_str("| Generation | Targets | Accepted | Failures | Visited | Seconds |\n");
    md.push_str("|------------|---------|----------|----------|---------|---------|\n");
    for round in &report.rounds {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {:.2} |\n",
            round.generation,
            round.targets,
            round.accepted,
            round.failures,
            round.visited_after,
            round.duration.as_secs_f64()
        ));
    }
    md.push('\n');

    md.push_str("## Link Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    for (outcome, count) in &stats.outcomes {
        md.push_str(&format!("| {} | {} |\n", outcome, count));
    }
    md.push('\n');

    if stats.target_fetch_failures > 0 || stats.worker_panics > 0 {
        md.push_str("## Target Failures\n\n");
        md.push_str(&format!("- **Unreachable targets**: {}\n", stats.target_fetch_failures));
        if stats.worker_panics > 0 {
            md.push_str(&format!("- **Aborted workers**: {}\n", stats.worker_panics));
        }
        md.push('\n');
    }

    md
}
