//! HTTP client for the Twitter search API.
//!
//! This module owns everything about talking to the wire: OAuth-signed
//! requests, rate-limit blocking, and payload deserialization. Callers only
//! see pages of [`Status`] values; a rate-limited request simply takes longer.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::ApiCredentials;
use crate::oauth::{build_oauth1_header, percent_encode};

use super::models::{SearchResponse, Status};
use super::search::SearchQuery;

/// Base URL of the v1.1 standard search endpoint.
const SEARCH_URL: &str = "https://api.twitter.com/1.1/search/tweets.json";

/// Fallback sleep when a 429 response carries no usable reset header.
const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 60;

/// A source of search result pages.
///
/// The paginator depends on this trait rather than on [`SearchClient`]
/// directly, so the paging logic can be exercised against a scripted source.
#[async_trait]
pub trait SearchSource {
    /// Fetches one page of results for the given query, newest first.
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Status>, Box<dyn std::error::Error + Send + Sync>>;
}

/// An authenticated client for the Twitter search API.
///
/// Constructed once at process start from the loaded credentials and passed
/// explicitly to whoever needs it. Rate limiting is absorbed here: when the
/// API answers 429, the client sleeps until the limit window resets and
/// retries, which callers observe only as a long-blocking call.
pub struct SearchClient {
    http: Client,
    credentials: ApiCredentials,
}

/// Sanitizes text for safe logging by truncating and escaping control characters.
fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.len() > max_len {
        format!(
            "{}... [truncated, {} total bytes]",
            &sanitized[..max_len],
            text.len()
        )
    } else {
        sanitized
    }
}

/// Computes how long to sleep for a 429 response.
///
/// Uses the `x-rate-limit-reset` header (epoch seconds) plus a small margin;
/// falls back to a fixed wait when the header is absent or unparseable.
fn rate_limit_wait(headers: &HeaderMap) -> u64 {
    let reset = headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());

    match reset {
        Some(reset) => {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(reset);
            reset.saturating_sub(now) + 2
        }
        None => DEFAULT_RATE_LIMIT_WAIT_SECS,
    }
}

impl SearchClient {
    /// Creates a client from loaded credentials.
    pub fn new(credentials: ApiCredentials) -> Self {
        SearchClient {
            http: Client::new(),
            credentials,
        }
    }

    /// Sends one signed GET to the search endpoint, sleeping through rate
    /// limit windows until a definitive response arrives.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The response body on success
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: On any non-rate-limit
    ///   failure (network error or non-success status)
    async fn fetch_page(
        &self,
        params: &[(String, String)],
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        loop {
            // A fresh header per attempt: nonce and timestamp are one-off.
            let auth_header = build_oauth1_header(&self.credentials, "GET", SEARCH_URL, params)?;
            let url = format!("{}?{}", SEARCH_URL, render_query(params));
            debug!("Request URL: {}", url);
            debug!("Request headers: Authorization: OAuth [REDACTED]");

            let response = self
                .http
                .get(&url)
                .header("Authorization", auth_header)
                .send()
                .await?;

            let status = response.status();
            debug!("Received response with status: {}", status);

            if status.is_success() {
                let body = response.text().await?;
                debug!("Search response: {} bytes received", body.len());
                return Ok(body);
            }

            if status.as_u16() == 429 {
                let wait = rate_limit_wait(response.headers());
                warn!(
                    "Rate limit reached, sleeping {} seconds until the window resets",
                    wait
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                info!("Rate limit window elapsed, retrying search request");
                continue;
            }

            let error_text = response.text().await?;
            error!("Search request failed - Status: {}", status);
            debug!(
                "Error response: {}",
                sanitize_for_logging(&error_text, 200)
            );
            return Err(format!("Twitter API error ({})", status).into());
        }
    }
}

/// Renders parameters into a query string with RFC 3986 encoding, matching
/// the encoding the OAuth signature was computed over.
fn render_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl SearchSource for SearchClient {
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Status>, Box<dyn std::error::Error + Send + Sync>> {
        let params = query.to_params();
        let body = self.fetch_page(&params).await?;
        let response: SearchResponse = serde_json::from_str(&body)?;
        debug!("Parsed {} statuses from search response", response.statuses.len());
        Ok(response.statuses)
    }
}
