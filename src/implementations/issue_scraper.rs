use async_trait::async_trait;
use log::{ debug, info, warn };
use std::sync::Arc;
use url::Url;

use crate::config::CheckerConfig;
use crate::errors::{ CheckerError, CheckerResult, ScrapeError };
use crate::implementations::issue_markup;
use crate::models::submission::Submission;
use crate::models::verification::FetchOutcome;
use crate::traits::page_fetcher::PageFetcher;
use crate::traits::submission_source::SubmissionSource;

/// Upper bound on listing pages; GitHub runs out long before this
pub const MAX_PAGES: u32 = 1000;

/// Collects submissions by walking the rendered issue list of a repository
pub struct GitHubIssueScraper {
    fetcher: Arc<dyn PageFetcher>,
    web_base: Url,
    repository: String,
    label_filter: Option<String>,
    exclude_labels: Vec<String>,
}

impl GitHubIssueScraper {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        web_base: &str,
        repository: &str,
        label_filter: Option<&str>
    ) -> CheckerResult<Self> {
        let web_base = Url::parse(web_base).map_err(|e|
            CheckerError::InvalidUrl(format!("{}: {}", web_base, e))
        )?;

        Ok(Self {
            fetcher,
            web_base,
            repository: repository.trim_matches('/').to_string(),
            label_filter: label_filter.map(str::to_string),
            exclude_labels: Vec::new(),
        })
    }

    pub fn from_config(fetcher: Arc<dyn PageFetcher>, config: &CheckerConfig) -> CheckerResult<Self> {
        let scraper = Self::new(
            fetcher,
            &config.github.web_base,
            config.repository(),
            config.label_filter()
        )?;
        Ok(scraper.exclude_labels(&config.exclude_labels()))
    }

    /// Drop issues carrying any of these labels
    pub fn exclude_labels(mut self, labels: &[&str]) -> Self {
        self.exclude_labels = labels
            .iter()
            .map(|label| label.to_string())
            .collect();
        self
    }

    fn excluded_by(&self, submission: &Submission) -> Option<&str> {
        self.exclude_labels
            .iter()
            .find(|label| submission.has_label(label))
            .map(String::as_str)
    }

    /// URL of one page of open issues, optionally narrowed to the label filter
    pub fn listing_url(&self, page: u32) -> Result<Url, ScrapeError> {
        let mut query = "is:open".to_string();
        if let Some(label) = &self.label_filter {
            if label.contains(char::is_whitespace) {
                query.push_str(&format!(" label:\"{}\"", label));
            } else {
                query.push_str(&format!(" label:{}", label));
            }
        }

        let mut url = self.resolve(&format!("/{}/issues", self.repository))?;
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn resolve(&self, href: &str) -> Result<Url, ScrapeError> {
        self.web_base.join(href).map_err(|e| ScrapeError::Fetch {
            url: href.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, ScrapeError> {
        match self.fetcher.fetch(url.as_str(), false).await {
            FetchOutcome::Body(body) => Ok(body),
            other =>
                Err(ScrapeError::Fetch {
                    url: url.to_string(),
                    reason: other.to_string(),
                }),
        }
    }

    /// Scrape one listing page. `Ok(None)` marks the end of pagination.
    async fn scrape_page(&self, page: u32) -> Result<Option<Vec<Submission>>, ScrapeError> {
        let url = self.listing_url(page)?;
        let html = self.fetch_page(&url).await?;
        let links = issue_markup::parse_issue_links(&html)?;
        if links.is_empty() {
            return Ok(None);
        }
        debug!("Page {} lists {} issues", page, links.len());

        let mut submissions = Vec::with_capacity(links.len());
        for href in links {
            match self.scrape_issue(&href).await {
                Ok(submission) => {
                    if let Some(label) = self.excluded_by(&submission) {
                        info!("Issue #{} carries excluded label {:?}, skipping", submission.id, label);
                        continue;
                    }
                    info!("Issue #{}: {} {:?}", submission.id, submission.url, submission.labels);
                    submissions.push(submission);
                }
                Err(e) => warn!("Skipping issue {}: {}", href, e),
            }
        }
        Ok(Some(submissions))
    }

    async fn scrape_issue(&self, href: &str) -> Result<Submission, ScrapeError> {
        let url = self.resolve(href)?;
        let html = self.fetch_page(&url).await?;
        let detail = issue_markup::parse_issue_detail(&html)?;
        let site_url = issue_markup::parse_submission_url(&detail.code_block)?;

        Ok(Submission {
            id: detail.id,
            url: site_url,
            labels: detail.labels,
        })
    }
}

#[async_trait]
impl SubmissionSource for GitHubIssueScraper {
    async fn fetch_submissions(&self) -> Vec<Submission> {
        info!("Collecting submissions from {}", self.repository);
        let mut submissions = Vec::new();

        for page in 1..=MAX_PAGES {
            info!("page={}", page);
            match self.scrape_page(page).await {
                Ok(Some(found)) => submissions.extend(found),
                Ok(None) => {
                    info!("Reached the last issue page");
                    break;
                }
                Err(e) => {
                    warn!("Stopping pagination at page {}: {}", page, e);
                    break;
                }
            }
        }

        info!("Collected {} submissions", submissions.len());
        submissions
    }
}
