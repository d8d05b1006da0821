use serde::{ Deserialize, Serialize };
use std::collections::BTreeSet;

use crate::models::verification::VerificationResult;

/// True for an empty URL or a bare scheme left over from the issue template
pub fn is_placeholder_url(url: &str) -> bool {
    matches!(url.trim(), "" | "http://" | "https://")
}

/// A candidate site collected from one GitHub issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Issue number, as it appears after `#`
    pub id: String,
    pub url: String,
    /// Label names on the issue when it was scraped
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl Submission {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            labels: BTreeSet::new(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn has_placeholder_url(&self) -> bool {
        is_placeholder_url(&self.url)
    }
}

/// Why a submission ended up in the error report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    NotFound,
    NetworkError,
    NotTheme,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::NetworkError => write!(f, "network error"),
            ErrorKind::NotTheme => write!(f, "not theme"),
        }
    }
}

/// A submission together with the error it failed verification with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSubmission {
    #[serde(flatten)]
    pub submission: Submission,
    pub error: ErrorKind,
    /// Page content captured for not-theme diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl FailedSubmission {
    /// Pair a submission with its outcome; `None` when verification succeeded
    pub fn from_outcome(submission: &Submission, result: &VerificationResult) -> Option<Self> {
        let (error, data) = match result {
            VerificationResult::Success { .. } => {
                return None;
            }
            VerificationResult::NotFound => (ErrorKind::NotFound, None),
            VerificationResult::NetworkError => (ErrorKind::NetworkError, None),
            VerificationResult::NotTheme { raw_html } => (ErrorKind::NotTheme, Some(raw_html.clone())),
        };
        Some(Self {
            submission: submission.clone(),
            error,
            data,
        })
    }
}
