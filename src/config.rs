use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

/// Configuration for the checker, loaded once from `config.yml`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckerConfig {
    /// Where submissions are collected from
    pub issues: IssuesConfig,

    /// Outbound request settings
    pub request: RequestConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default)]
    pub checker: RetryConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IssuesConfig {
    /// Repository in `owner/name` form
    pub repo: String,

    /// Only scrape issues carrying this label
    #[serde(default)]
    pub label: Option<String>,

    /// Issues carrying any of these labels are left alone
    #[serde(default)]
    pub exclude_labels: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RequestConfig {
    /// Per-request timeout in seconds
    pub timeout: u64,
}

/// Patterns that identify a genuine theme installation
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    /// Brand name, matched case-insensitively
    pub name: String,

    /// Layout tokens that must all appear in the page
    pub markers: Vec<String>,

    /// Attribute carrying the declared theme version
    pub version_attribute: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Stellar".to_string(),
            markers: vec!["l_header".to_string(), "l_body".to_string()],
            version_attribute: "theme-version".to_string(),
        }
    }
}

/// Label names applied by the annotator
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LabelConfig {
    /// Transient label, cleared once the site verifies again
    pub network_warning: String,
    pub not_theme: String,
    pub invalid: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            network_warning: "network-warning".to_string(),
            not_theme: "maybe-not-theme".to_string(),
            invalid: "invalid".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    /// Seconds to wait before re-checking a page that did not match
    pub retry_cooldown: u64,

    /// Close issues whose site is missing or not running the theme
    pub close_invalid: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_cooldown: 20,
            close_invalid: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Schema tag; also the name of the output directory
    pub version: String,

    /// Root directory for report files
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            version: "v2".to_string(),
            dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base of the rendered web UI
    pub web_base: String,

    /// Base of the REST API
    pub api_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            web_base: "https://github.com".to_string(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

impl CheckerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: CheckerConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut parts = self.issues.repo.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.trim().is_empty() && !name.trim().is_empty()
        );
        if !well_formed {
            return Err(ConfigError::InvalidField {
                field: "issues.repo",
                message: format!("expected owner/name, got {:?}", self.issues.repo),
            });
        }

        if self.request.timeout == 0 {
            return Err(ConfigError::InvalidField {
                field: "request.timeout",
                message: "must be greater than zero".to_string(),
            });
        }

        if self.theme.name.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "theme.name",
                message: "must not be empty".to_string(),
            });
        }

        if self.theme.markers.iter().all(|marker| marker.trim().is_empty()) {
            return Err(ConfigError::InvalidField {
                field: "theme.markers",
                message: "at least one layout marker is required".to_string(),
            });
        }

        Ok(())
    }

    pub fn repository(&self) -> &str {
        self.issues.repo.trim()
    }

    /// The label filter, with an empty string treated as no filter
    pub fn label_filter(&self) -> Option<&str> {
        self.issues.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    /// Excluded labels, trimmed, with blank entries dropped
    pub fn exclude_labels(&self) -> Vec<&str> {
        self.issues.exclude_labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .collect()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request.timeout)
    }

    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_secs(self.checker.retry_cooldown)
    }
}
