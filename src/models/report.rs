use serde::{ Deserialize, Serialize };

use crate::models::submission::{ FailedSubmission, Submission };

/// A versioned list written at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report<T> {
    pub version: String,
    pub content: Vec<T>,
}

impl<T> Report<T> {
    pub fn new(version: impl Into<String>, content: Vec<T>) -> Self {
        Self {
            version: version.into(),
            content,
        }
    }
}

/// Submissions that failed verification, written to `<version>/error.json`
pub type ErrorReport = Report<FailedSubmission>;

/// Everything the scraper collected, written to `<version>/data.json`
pub type SubmissionReport = Report<Submission>;
