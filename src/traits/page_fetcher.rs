use async_trait::async_trait;

use crate::models::verification::FetchOutcome;

/// Trait for issuing a single GET request and classifying the response
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`. With `randomize_identity` the request carries a freshly
    /// generated browser user agent instead of the fixed default one.
    ///
    /// Implementations never retry; the caller owns retry policy.
    async fn fetch(&self, url: &str, randomize_identity: bool) -> FetchOutcome;
}
