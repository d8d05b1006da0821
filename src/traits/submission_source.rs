use async_trait::async_trait;

use crate::models::submission::Submission;

/// Trait for collecting submissions from wherever they are published
///
/// The rest of the pipeline only sees this interface, so the way submissions
/// are discovered (rendered HTML today) can change without touching
/// verification or annotation.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Collect every submission currently open. Failures on individual
    /// entries are skipped; whatever was collected before a fatal page error
    /// is still returned.
    async fn fetch_submissions(&self) -> Vec<Submission>;
}
