use std::fmt;

/// What the fetch layer saw for one GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 200 with the decoded body
    Body(String),
    /// HTTP 404
    NotFound,
    /// Any other status code
    NotOk(u16),
    /// The request itself failed (DNS, TLS, timeout, bad URL, ...)
    TransportError(String),
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Body(body) => write!(f, "OK ({} bytes)", body.len()),
            FetchOutcome::NotFound => write!(f, "HTTP 404"),
            FetchOutcome::NotOk(status) => write!(f, "HTTP {}", status),
            FetchOutcome::TransportError(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

/// Classification of one submission's homepage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// The page runs the theme; `version` is the declared theme version, if any
    Success { version: Option<String> },
    NotFound,
    /// The page loaded but did not match; the body is kept for the report
    NotTheme { raw_html: String },
    NetworkError,
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, VerificationResult::Success { .. })
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationResult::Success { version: Some(version) } => write!(f, "OK ({})", version),
            VerificationResult::Success { version: None } => write!(f, "OK"),
            VerificationResult::NotFound => write!(f, "Not found"),
            VerificationResult::NotTheme { .. } => write!(f, "Not theme"),
            VerificationResult::NetworkError => write!(f, "Network error"),
        }
    }
}
