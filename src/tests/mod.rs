//! Shared fakes for the trait seams, plus the test modules.

use async_trait::async_trait;
use std::collections::{ HashMap, VecDeque };
use std::sync::Mutex;

use crate::errors::{ CheckerError, CheckerResult };
use crate::models::verification::FetchOutcome;
use crate::traits::issue_tracker::IssueTracker;
use crate::traits::page_fetcher::PageFetcher;

mod theme_verifier_tests;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves fixed outcomes by URL; unknown URLs are a 404
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, FetchOutcome>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, outcome: FetchOutcome) -> Self {
        self.pages.insert(url.to_string(), outcome);
        self
    }

    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.with_page(url, FetchOutcome::Body(body.to_string()))
    }

    /// Every request so far as `(url, randomize_identity)`
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str, randomize_identity: bool) -> FetchOutcome {
        self.calls.lock().unwrap().push((url.to_string(), randomize_identity));
        self.pages.get(url).cloned().unwrap_or(FetchOutcome::NotFound)
    }
}

/// Returns queued outcomes in order, regardless of URL
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<FetchOutcome>>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<FetchOutcome>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, randomize_identity: bool) -> FetchOutcome {
        self.calls.lock().unwrap().push((url.to_string(), randomize_identity));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| FetchOutcome::TransportError("no scripted response left".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    AddLabels(String, Vec<String>),
    DeleteLabel(String, String),
    Comment(String, String),
    Close(String),
}

/// Records every write; with `failing()` each call also returns an error
#[derive(Default)]
pub struct RecordingTracker {
    calls: Mutex<Vec<TrackerCall>>,
    fail: bool,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Labels added, flattened in call order
    pub fn added_labels(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TrackerCall::AddLabels(_, labels) => Some(labels),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn comments(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TrackerCall::Comment(_, body) => Some(body),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: TrackerCall) -> CheckerResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(CheckerError::Api {
                status: 403,
                message: "rate limited".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn add_labels(&self, issue_id: &str, labels: &[String]) -> CheckerResult<()> {
        self.record(TrackerCall::AddLabels(issue_id.to_string(), labels.to_vec()))
    }

    async fn delete_label(&self, issue_id: &str, label: &str) -> CheckerResult<()> {
        self.record(TrackerCall::DeleteLabel(issue_id.to_string(), label.to_string()))
    }

    async fn post_comment(&self, issue_id: &str, body: &str) -> CheckerResult<()> {
        self.record(TrackerCall::Comment(issue_id.to_string(), body.to_string()))
    }

    async fn close_issue(&self, issue_id: &str) -> CheckerResult<()> {
        self.record(TrackerCall::Close(issue_id.to_string()))
    }
}

/// A homepage as the theme renders it
pub fn theme_page(version: Option<&str>) -> String {
    let meta = match version {
        Some(version) =>
            format!(
                r#"<meta name="hexo-theme" content="https://github.com/xaoxuu/hexo-theme-stellar/tree/{v}" theme-name="Stellar" theme-version="{v}">"#,
                v = version
            ),
        None => r#"<meta name="generator" content="Hexo">"#.to_string(),
    };
    format!(
        "<html><head>{}<title>My blog</title></head><body><div class=\"l_body\"><header class=\"l_header\">Stellar</header></div></body></html>",
        meta
    )
}
