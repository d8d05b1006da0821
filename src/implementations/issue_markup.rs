//! Everything that depends on the shape of GitHub's rendered issue pages.
//!
//! The selectors below follow GitHub's front-end markup, which changes
//! without notice. When it does, this is the only file that should need
//! touching.

use scraper::{ ElementRef, Html, Selector };
use std::collections::BTreeSet;

use crate::errors::ScrapeError;

const ISSUE_LIST: &str = r#"div[aria-label="Issues"]"#;
const ISSUE_LINK: &str = "a.Link--primary";
const ISSUE_NUMBER: &str = "span.f1-light";
const LABEL_CONTAINER: &str = "div.js-issue-labels";
const LABEL: &str = "a.IssueLabel";
const CODE_BLOCK: &str = "pre";

/// Fields pulled from one issue detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetail {
    pub id: String,
    pub labels: BTreeSet<String>,
    /// Text of the first preformatted block
    pub code_block: String,
}

fn selector(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css,
        message: format!("{:?}", e),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Extract issue links (hrefs, in document order, without duplicates) from
/// an issue list page. An empty result means there are no more pages.
pub fn parse_issue_links(html: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let region_selector = selector(ISSUE_LIST)?;
    let link_selector = selector(ISSUE_LINK)?;

    let region = document.select(&region_selector).next().ok_or(ScrapeError::MissingIssueList)?;

    let mut links: Vec<String> = Vec::new();
    for link in region.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !href.is_empty() && !links.iter().any(|known| known == href) {
            links.push(href.to_string());
        }
    }
    Ok(links)
}

/// Extract the issue number, labels and first code block from a detail page
pub fn parse_issue_detail(html: &str) -> Result<IssueDetail, ScrapeError> {
    let document = Html::parse_document(html);

    let number_text = document
        .select(&selector(ISSUE_NUMBER)?)
        .next()
        .map(element_text)
        .ok_or(ScrapeError::MissingField("issue number"))?;
    let id = parse_issue_number(&number_text)?;

    let label_selector = selector(LABEL)?;
    let labels = document
        .select(&selector(LABEL_CONTAINER)?)
        .next()
        .map(|container| {
            container
                .select(&label_selector)
                .map(|label| element_text(label).trim().to_string())
                .filter(|label| !label.is_empty())
                .collect::<BTreeSet<String>>()
        })
        .unwrap_or_default();

    let code_block = document
        .select(&selector(CODE_BLOCK)?)
        .next()
        .map(element_text)
        .ok_or(ScrapeError::MissingField("submission code block"))?;

    Ok(IssueDetail { id, labels, code_block })
}

/// Parse the digits following `#` in text such as `#42`
pub fn parse_issue_number(text: &str) -> Result<String, ScrapeError> {
    let invalid = || ScrapeError::InvalidIssueId(text.trim().to_string());

    let (_, after_hash) = text.split_once('#').ok_or_else(invalid)?;
    let digits: String = after_hash
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return Err(invalid());
    }
    Ok(digits)
}

/// Read the `url` field from a submission code block.
///
/// The block must be a JSON object; `{}` or an object without a string `url`
/// is rejected.
pub fn parse_submission_url(code_block: &str) -> Result<String, ScrapeError> {
    let trimmed = code_block.trim();
    if !trimmed.starts_with('{') {
        return Err(ScrapeError::NotJson);
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    match value.get("url") {
        Some(serde_json::Value::String(url)) => Ok(url.trim().to_string()),
        _ => Err(ScrapeError::MissingUrl),
    }
}
