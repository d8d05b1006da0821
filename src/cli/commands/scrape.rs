use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cli::ui;
use stellar_checker::config::CheckerConfig;
use stellar_checker::implementations::http_fetcher::HttpFetcher;
use stellar_checker::implementations::issue_scraper::GitHubIssueScraper;
use stellar_checker::implementations::report_writer::{ self, SUBMISSION_REPORT_FILE };
use stellar_checker::models::report::SubmissionReport;
use stellar_checker::traits::submission_source::SubmissionSource;

/// Collect submissions without verifying them
pub async fn execute(config: &CheckerConfig, write_output: bool) -> Result<()> {
    ui::print_header("Collecting Submissions");

    let fetcher = Arc::new(HttpFetcher::new(config.request_timeout())?);
    let source = GitHubIssueScraper::from_config(fetcher, config)?;
    let spinner = ui::spinner_with_message(&format!("Scraping open issues of {}...", config.repository()));
    let submissions = source.fetch_submissions().await;
    spinner.finish_with_message(format!("Collected {} submissions", submissions.len()));

    for submission in &submissions {
        let labels = submission.labels.iter().cloned().collect::<Vec<_>>().join(", ");
        ui::print_result(&format!("#{}", submission.id), &format!("{} [{}]", submission.url, labels));
    }

    if write_output {
        let report = SubmissionReport::new(config.output.version.clone(), submissions);
        let path = report_writer::write_report(
            Path::new(&config.output.dir),
            SUBMISSION_REPORT_FILE,
            &report
        )?;
        ui::print_success(&format!("Submissions written to {}", path.display()));
    }

    Ok(())
}
