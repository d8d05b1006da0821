use log::{ debug, info, warn };
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ CheckerConfig, ConfigError, ThemeConfig };
use crate::errors::CheckerResult;
use crate::models::submission::{ is_placeholder_url, Submission };
use crate::models::verification::{ FetchOutcome, VerificationResult };
use crate::traits::page_fetcher::PageFetcher;

/// Hexo's generator meta tag, whose `content` links the theme source at `/tree/<version>`
const THEME_META_NAME: &str = "hexo-theme";

/// Pattern checks that decide whether a page is a theme installation
#[derive(Debug, Clone)]
pub struct ThemeMatcher {
    brand: Regex,
    markers: Vec<String>,
    version: Regex,
    meta_tag: Regex,
    tree_version: Regex,
}

impl ThemeMatcher {
    pub fn new(theme: &ThemeConfig) -> Result<Self, ConfigError> {
        let brand = Regex::new(&format!("(?i){}", regex::escape(theme.name.trim()))).map_err(|e|
            ConfigError::InvalidField {
                field: "theme.name",
                message: e.to_string(),
            }
        )?;
        let version = Regex::new(
            &format!(r#"(?is)\s{}\s*=\s*"([^"]*)""#, regex::escape(theme.version_attribute.trim()))
        ).map_err(|e| ConfigError::InvalidField {
            field: "theme.version_attribute",
            message: e.to_string(),
        })?;

        let markers: Vec<String> = theme.markers
            .iter()
            .map(|marker| marker.trim().to_string())
            .filter(|marker| !marker.is_empty())
            .collect();
        if markers.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "theme.markers",
                message: "at least one layout marker is required".to_string(),
            });
        }

        let meta_tag = Regex::new(r"(?is)<meta\s[^>]*>").map_err(|e| ConfigError::InvalidField {
            field: "theme",
            message: e.to_string(),
        })?;
        let tree_version = Regex::new(r"/tree/(\d[\d.]*(?:-[\w.]+)?)").map_err(|e|
            ConfigError::InvalidField {
                field: "theme",
                message: e.to_string(),
            }
        )?;

        Ok(Self {
            brand,
            markers,
            version,
            meta_tag,
            tree_version,
        })
    }

    pub fn has_brand(&self, body: &str) -> bool {
        self.brand.is_match(body)
    }

    /// Every layout marker occurs at least once
    pub fn has_layout_markers(&self, body: &str) -> bool {
        self.markers.iter().all(|marker| body.contains(marker.as_str()))
    }

    /// The declared theme version; an empty attribute value counts as absent.
    /// Falls back to the `/tree/<version>` segment of the generator meta tag.
    pub fn extract_version(&self, body: &str) -> Option<String> {
        self.version
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|value| value.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| self.meta_tree_version(body))
    }

    fn meta_tree_version(&self, body: &str) -> Option<String> {
        let name = format!("\"{}\"", THEME_META_NAME);
        self.meta_tag
            .find_iter(body)
            .map(|tag| tag.as_str())
            .filter(|tag| tag.contains(name.as_str()))
            .find_map(|tag| self.tree_version.captures(tag))
            .and_then(|caps| caps.get(1))
            .map(|value| value.as_str().to_string())
    }

    pub fn classify(&self, body: &str) -> VerificationResult {
        if self.has_brand(body) && self.has_layout_markers(body) {
            VerificationResult::Success {
                version: self.extract_version(body),
            }
        } else {
            VerificationResult::NotTheme {
                raw_html: body.to_string(),
            }
        }
    }
}

/// Fetches a submission's homepage and classifies it.
///
/// A page that loads but does not match is fetched once more after the
/// cooldown, this time with a randomised user agent. Missing pages and
/// network failures are final.
pub struct ThemeVerifier {
    fetcher: Arc<dyn PageFetcher>,
    matcher: ThemeMatcher,
    cooldown: Duration,
}

impl ThemeVerifier {
    pub fn new(fetcher: Arc<dyn PageFetcher>, matcher: ThemeMatcher, cooldown: Duration) -> Self {
        Self { fetcher, matcher, cooldown }
    }

    pub fn from_config(fetcher: Arc<dyn PageFetcher>, config: &CheckerConfig) -> CheckerResult<Self> {
        let matcher = ThemeMatcher::new(&config.theme)?;
        Ok(Self::new(fetcher, matcher, config.retry_cooldown()))
    }

    pub async fn verify(&self, submission: &Submission) -> VerificationResult {
        info!("Checking issue #{}: {}", submission.id, submission.url);

        match self.check_url(&submission.url, false).await {
            VerificationResult::NotTheme { .. } => {
                info!(
                    "Issue #{} did not match, retrying in {:?} with a random user agent",
                    submission.id,
                    self.cooldown
                );
                tokio::time::sleep(self.cooldown).await;
                self.check_url(&submission.url, true).await
            }
            other => other,
        }
    }

    /// One fetch and classification, without retry
    pub async fn check_url(&self, url: &str, randomize_identity: bool) -> VerificationResult {
        if is_placeholder_url(url) {
            debug!("Placeholder URL {:?}, skipping fetch", url);
            return VerificationResult::NetworkError;
        }

        match self.fetcher.fetch(url, randomize_identity).await {
            FetchOutcome::Body(body) => {
                let result = self.matcher.classify(&body);
                debug!("{} classified as {}", url, result);
                result
            }
            FetchOutcome::NotFound => VerificationResult::NotFound,
            FetchOutcome::NotOk(status) => {
                warn!("{} answered HTTP {}", url, status);
                VerificationResult::NetworkError
            }
            FetchOutcome::TransportError(reason) => {
                warn!("{} unreachable: {}", url, reason);
                VerificationResult::NetworkError
            }
        }
    }
}
