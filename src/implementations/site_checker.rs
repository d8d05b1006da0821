use log::info;

use crate::implementations::annotator::IssueAnnotator;
use crate::implementations::theme_verifier::ThemeVerifier;
use crate::models::submission::{ FailedSubmission, Submission };
use crate::models::verification::VerificationResult;

/// Verify each submission in turn, annotate its issue, and return the ones
/// that failed in input order.
///
/// `annotator` is optional so a run without a token, or a dry run, still
/// produces a report. `on_result` sees every outcome as it is decided.
pub async fn check_submissions<F>(
    verifier: &ThemeVerifier,
    annotator: Option<&IssueAnnotator<'_>>,
    submissions: &[Submission],
    mut on_result: F
) -> Vec<FailedSubmission>
    where F: FnMut(&Submission, &VerificationResult)
{
    let mut failed = Vec::new();

    for submission in submissions {
        let result = verifier.verify(submission).await;
        info!("Issue #{} -> {}", submission.id, result);
        on_result(submission, &result);

        if let Some(annotator) = annotator {
            annotator.annotate(submission, &result).await;
        }

        if let Some(failure) = FailedSubmission::from_outcome(submission, &result) {
            failed.push(failure);
        }
    }

    info!("{} of {} submissions failed verification", failed.len(), submissions.len());
    failed
}
