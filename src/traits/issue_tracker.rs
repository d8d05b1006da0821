use async_trait::async_trait;

use crate::errors::CheckerResult;

/// Trait for write operations on the issues that submissions came from
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Add `labels` to the issue, in order
    async fn add_labels(&self, issue_id: &str, labels: &[String]) -> CheckerResult<()>;

    /// Remove a single label from the issue
    async fn delete_label(&self, issue_id: &str, label: &str) -> CheckerResult<()>;

    /// Post a comment with the given markdown body
    async fn post_comment(&self, issue_id: &str, body: &str) -> CheckerResult<()>;

    /// Set the issue state to closed
    async fn close_issue(&self, issue_id: &str) -> CheckerResult<()>;
}
