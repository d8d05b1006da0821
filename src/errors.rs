use thiserror::Error;

use crate::config::ConfigError;

/// Custom error types for the checker
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("GitHub API error: HTTP {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Missing GitHub token")]
    MissingToken,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Result type specific to checker operations
pub type CheckerResult<T> = Result<T, CheckerError>;

/// Failures while pulling submissions out of rendered issue pages.
///
/// These never abort a run: issue-level errors skip the issue, page-level
/// errors end pagination.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Issue list region not found on page")]
    MissingIssueList,

    #[error("Missing {0} on issue page")]
    MissingField(&'static str),

    #[error("Unparseable issue number: {0:?}")]
    InvalidIssueId(String),

    #[error("Submission block is not a JSON object")]
    NotJson,

    #[error("Submission JSON has no url field")]
    MissingUrl,

    #[error("Malformed submission JSON: {0}")]
    BadJson(#[from] serde_json::Error),

    #[error("Invalid selector {selector}: {message}")]
    Selector { selector: &'static str, message: String },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}
