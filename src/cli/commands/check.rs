use anyhow::Result;
use log::warn;
use std::path::Path;
use std::sync::Arc;

use crate::cli::ui;
use stellar_checker::config::CheckerConfig;
use stellar_checker::implementations::annotator::IssueAnnotator;
use stellar_checker::implementations::github_client::GitHubIssueClient;
use stellar_checker::implementations::http_fetcher::HttpFetcher;
use stellar_checker::implementations::issue_scraper::GitHubIssueScraper;
use stellar_checker::implementations::report_writer;
use stellar_checker::implementations::site_checker;
use stellar_checker::implementations::theme_verifier::ThemeVerifier;
use stellar_checker::models::report::ErrorReport;
use stellar_checker::models::submission::ErrorKind;
use stellar_checker::traits::page_fetcher::PageFetcher;
use stellar_checker::traits::submission_source::SubmissionSource;

/// Full pipeline: scrape, verify, annotate, report.
///
/// Per-site failures never fail the command; only a report that cannot be
/// written does, after the issues have already been annotated.
pub async fn execute(config: &CheckerConfig, token: Option<&str>, dry_run: bool) -> Result<()> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.request_timeout())?);

    ui::print_header("Collecting Submissions");
    let source = GitHubIssueScraper::from_config(fetcher.clone(), config)?;
    let spinner = ui::spinner_with_message(&format!("Scraping open issues of {}...", config.repository()));
    let submissions = source.fetch_submissions().await;
    spinner.finish_with_message(format!("Collected {} submissions", submissions.len()));

    let client = if dry_run {
        ui::print_info("Dry run: issues will not be labelled or commented on.");
        None
    } else {
        match token {
            Some(token) =>
                match GitHubIssueClient::from_config(config, token) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        warn!("GitHub client unavailable: {}", e);
                        ui::print_warning(&format!("Skipping issue updates: {}", e));
                        None
                    }
                }
            None => {
                ui::print_warning("No GitHub token given; skipping issue updates.");
                None
            }
        }
    };
    let annotator = client.as_ref().map(|client| IssueAnnotator::from_config(client, config));

    ui::print_header("Checking Sites");
    let verifier = ThemeVerifier::from_config(fetcher, config)?;
    let progress = ui::create_progress_bar(submissions.len() as u64, "Checking");
    let failed = site_checker::check_submissions(
        &verifier,
        annotator.as_ref(),
        &submissions,
        |submission, result| {
            progress.println(ui::format_outcome(submission, result));
            progress.inc(1);
        }
    ).await;
    progress.finish_and_clear();

    let count = |kind: ErrorKind| failed.iter().filter(|failure| failure.error == kind).count();
    ui::print_header("Summary");
    ui::print_result("Checked", &submissions.len().to_string());
    ui::print_result("Passed", &(submissions.len() - failed.len()).to_string());
    ui::print_result("Not theme", &count(ErrorKind::NotTheme).to_string());
    ui::print_result("Not found", &count(ErrorKind::NotFound).to_string());
    ui::print_result("Network errors", &count(ErrorKind::NetworkError).to_string());

    let report = ErrorReport::new(config.output.version.clone(), failed);
    let path = report_writer::write_error_report(Path::new(&config.output.dir), &report)?;
    ui::print_success(&format!("Error report written to {}", path.display()));

    Ok(())
}
