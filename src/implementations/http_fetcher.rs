use async_trait::async_trait;
use log::{ debug, warn };
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{ CONNECTION, USER_AGENT };
use reqwest::StatusCode;
use std::time::Duration;

use crate::errors::{ CheckerError, CheckerResult };
use crate::models::verification::FetchOutcome;
use crate::traits::page_fetcher::PageFetcher;

/// Agent sent when identity randomisation is off. Its Chrome major version is
/// outside the randomised range, so the two can never be confused.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const OS_TOKENS: [&str; 4] = [
    "(Windows NT 6.1; WOW64)",
    "(Windows NT 10.0; WOW64)",
    "(X11; Linux x86_64)",
    "(Macintosh; Intel Mac OS X 10_12_6)",
];

/// Build a plausible desktop Chrome user agent from random parts
pub fn random_user_agent<R: Rng + ?Sized>(rng: &mut R) -> String {
    let major = rng.gen_range(55..=62);
    let build = rng.gen_range(0..=3200);
    let patch = rng.gen_range(0..=140);
    let os = OS_TOKENS.choose(rng).copied().unwrap_or(OS_TOKENS[0]);

    format!(
        "Mozilla/5.0 {} AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.{}.{} Safari/537.36",
        os,
        major,
        build,
        patch
    )
}

fn pick_user_agent(randomize_identity: bool) -> String {
    if randomize_identity {
        random_user_agent(&mut rand::thread_rng())
    } else {
        DEFAULT_USER_AGENT.to_string()
    }
}

/// Decode a response body as UTF-8, replacing invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// `PageFetcher` backed by reqwest
///
/// Every request is sent with `Connection: close` and the client keeps no
/// idle connections. Certificate errors are ignored: many submitted sites
/// run on self-signed or expired certificates and should still be checked.
#[derive(Clone)]
pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> CheckerResult<Self> {
        let http_client = reqwest::Client
            ::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| CheckerError::HttpClient(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, randomize_identity: bool) -> FetchOutcome {
        if url.trim().is_empty() {
            return FetchOutcome::TransportError("empty URL".to_string());
        }

        let user_agent = pick_user_agent(randomize_identity);
        debug!("GET {} (user agent: {})", url, user_agent);

        let response = match
            self.http_client
                .get(url)
                .header(USER_AGENT, user_agent)
                .header(CONNECTION, "close")
                .send().await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                if e.is_timeout() {
                    warn!("Request timed out");
                }
                if e.is_connect() {
                    warn!("Connection error - check network connectivity");
                }
                return FetchOutcome::TransportError(e.to_string());
            }
        };

        let status = response.status();
        debug!("{} -> HTTP {}", url, status.as_u16());
        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }
        if status != StatusCode::OK {
            return FetchOutcome::NotOk(status.as_u16());
        }

        match response.bytes().await {
            Ok(bytes) => FetchOutcome::Body(decode_lossy(&bytes)),
            Err(e) => {
                warn!("Failed to read body from {}: {}", url, e);
                FetchOutcome::TransportError(e.to_string())
            }
        }
    }
}
