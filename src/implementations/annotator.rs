use chrono::{ DateTime, Utc };
use log::{ error, info };

use crate::config::{ CheckerConfig, LabelConfig };
use crate::models::submission::Submission;
use crate::models::verification::VerificationResult;
use crate::traits::issue_tracker::IssueTracker;

/// GitHub rejects comment bodies above 65536 characters
const MAX_DETAIL_CHARS: usize = 60_000;

pub const INVALID_URL_DETAIL: &str = "Invalid URL";
pub const NOT_FOUND_DETAIL: &str = "HTTP 404 Not Found";

/// Comment posted when a site could not be recognised as a theme install
pub fn diagnostic_comment(theme_name: &str, detail: &str, checked_at: DateTime<Utc>) -> String {
    let detail = truncate_chars(detail, MAX_DETAIL_CHARS);
    format!(
        "**⚠️ Sorry, the site checker could not detect the {theme} theme on your site.**\n\n\
         If you disagree with this result, please leave a comment below.\n\n\
         This is what the checker received at {time} (automated checks can be blocked by site firewalls):\n\n\
         <details><summary>Site response</summary>\n\n\
         {fence}\n\n{detail}\n\n{fence}\n\n\
         </details>\n",
        theme = theme_name,
        time = checked_at.format("%Y-%m-%d %H:%M:%S UTC"),
        fence = code_fence(detail),
        detail = detail
    )
}

/// A backtick fence longer than any backtick run inside `text`
fn code_fence(text: &str) -> String {
    let longest_run = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Applies labels and comments to an issue based on its verification result.
///
/// Every tracker call is best-effort: failures are logged and the remaining
/// actions still run.
pub struct IssueAnnotator<'a> {
    tracker: &'a dyn IssueTracker,
    labels: LabelConfig,
    theme_name: String,
    close_invalid: bool,
}

impl<'a> IssueAnnotator<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, labels: LabelConfig, theme_name: &str) -> Self {
        Self {
            tracker,
            labels,
            theme_name: theme_name.to_string(),
            close_invalid: false,
        }
    }

    pub fn from_config(tracker: &'a dyn IssueTracker, config: &CheckerConfig) -> Self {
        Self::new(tracker, config.labels.clone(), &config.theme.name).close_invalid(
            config.checker.close_invalid
        )
    }

    /// Also close issues that fail as not-theme, invalid or missing.
    /// Off unless the configuration opts in.
    pub fn close_invalid(mut self, enabled: bool) -> Self {
        self.close_invalid = enabled;
        self
    }

    pub async fn annotate(&self, submission: &Submission, result: &VerificationResult) {
        let id = submission.id.as_str();
        match result {
            VerificationResult::Success { version } => {
                if let Some(version) = version {
                    self.add_label(id, version).await;
                }
                if submission.has_label(&self.labels.network_warning) {
                    self.remove_label(id, &self.labels.network_warning).await;
                }
            }
            VerificationResult::NotTheme { raw_html } => {
                self.add_label(id, &self.labels.not_theme).await;
                self.comment(id, raw_html).await;
                self.close(id).await;
            }
            VerificationResult::NetworkError => {
                self.add_label(id, &self.labels.network_warning).await;
                if submission.has_placeholder_url() {
                    self.add_label(id, &self.labels.invalid).await;
                    self.comment(id, INVALID_URL_DETAIL).await;
                    self.close(id).await;
                }
            }
            VerificationResult::NotFound => {
                self.add_label(id, &self.labels.network_warning).await;
                self.add_label(id, &self.labels.invalid).await;
                self.comment(id, NOT_FOUND_DETAIL).await;
                self.close(id).await;
            }
        }
    }

    async fn add_label(&self, id: &str, label: &str) {
        info!("Adding label {:?} to issue #{}", label, id);
        if let Err(e) = self.tracker.add_labels(id, &[label.to_string()]).await {
            error!("Failed to add label {:?} to issue #{}: {}", label, id, e);
        }
    }

    async fn remove_label(&self, id: &str, label: &str) {
        info!("Removing label {:?} from issue #{}", label, id);
        if let Err(e) = self.tracker.delete_label(id, label).await {
            error!("Failed to remove label {:?} from issue #{}: {}", label, id, e);
        }
    }

    async fn comment(&self, id: &str, detail: &str) {
        let body = diagnostic_comment(&self.theme_name, detail, Utc::now());
        if let Err(e) = self.tracker.post_comment(id, &body).await {
            error!("Failed to comment on issue #{}: {}", id, e);
        }
    }

    async fn close(&self, id: &str) {
        if !self.close_invalid {
            return;
        }
        info!("Closing issue #{}", id);
        if let Err(e) = self.tracker.close_issue(id).await {
            error!("Failed to close issue #{}: {}", id, e);
        }
    }
}
