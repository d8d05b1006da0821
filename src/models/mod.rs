pub mod submission;
pub mod verification;
pub mod report;

// Re-export common model types
pub use submission::{ ErrorKind, FailedSubmission, Submission };
pub use verification::{ FetchOutcome, VerificationResult };
pub use report::{ ErrorReport, Report, SubmissionReport };
