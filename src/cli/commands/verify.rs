use anyhow::Result;
use std::sync::Arc;

use crate::cli::ui;
use stellar_checker::config::CheckerConfig;
use stellar_checker::implementations::http_fetcher::HttpFetcher;
use stellar_checker::implementations::theme_verifier::ThemeVerifier;
use stellar_checker::models::submission::Submission;
use stellar_checker::models::verification::VerificationResult;

/// Check one URL and print how it was classified
pub async fn execute(config: &CheckerConfig, url: &str) -> Result<()> {
    ui::print_header("Verifying Site");

    let fetcher = Arc::new(HttpFetcher::new(config.request_timeout())?);
    let verifier = ThemeVerifier::from_config(fetcher, config)?;
    let submission = Submission::new("-", url);

    let spinner = ui::spinner_with_message(&format!("Fetching {}...", url));
    let result = verifier.verify(&submission).await;
    spinner.finish_and_clear();

    println!("{}", ui::format_outcome(&submission, &result));
    match &result {
        VerificationResult::Success { version: Some(version) } => {
            ui::print_success(&format!("{} theme detected, version {}", config.theme.name, version));
        }
        VerificationResult::Success { version: None } => {
            ui::print_success(&format!("{} theme detected, no version declared", config.theme.name));
        }
        VerificationResult::NotTheme { raw_html } => {
            ui::print_warning(&format!("{} theme not detected", config.theme.name));
            ui::print_result("Received", &format!("{} bytes", raw_html.len()));
        }
        VerificationResult::NotFound => ui::print_error("Site returned HTTP 404"),
        VerificationResult::NetworkError => ui::print_error("Site could not be reached"),
    }

    Ok(())
}
