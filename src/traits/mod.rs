pub mod page_fetcher;
pub mod submission_source;
pub mod issue_tracker;

// Re-export traits
pub use page_fetcher::PageFetcher;
pub use submission_source::SubmissionSource;
pub use issue_tracker::IssueTracker;
