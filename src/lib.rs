pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ CheckerConfig, ConfigError, LabelConfig, ThemeConfig };
pub use errors::{ CheckerError, CheckerResult, ScrapeError };
pub use implementations::annotator::IssueAnnotator;
pub use implementations::github_client::GitHubIssueClient;
pub use implementations::http_fetcher::HttpFetcher;
pub use implementations::issue_scraper::GitHubIssueScraper;
pub use implementations::theme_verifier::{ ThemeMatcher, ThemeVerifier };
pub use models::{
    submission::{ ErrorKind, FailedSubmission, Submission },
    verification::{ FetchOutcome, VerificationResult },
    report::{ ErrorReport, Report, SubmissionReport },
};
pub use traits::{ IssueTracker, PageFetcher, SubmissionSource };
