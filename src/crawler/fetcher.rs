//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client
//! - GET requests carrying a rotated header set
//! - Turning the response body into a parsed document
//!
//! Response status is not used to reject a page. Error pages are parsed like
//! any other body and simply yield no links or empty fields. Transport
//! failures are returned as errors and end the run.

use crate::crawler::identity::HeaderSet;
use crate::{Result, ScraperError};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// The client sets no User-Agent of its own; every request supplies one
/// through its header set.
///
/// # Example
///
/// ```no_run
/// use job_trawler::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests and parses the returned markup
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL and returns the raw response body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body text, whatever the status code
    /// * `Err(ScraperError::Http)` - Timeout, DNS failure, refused connection
    pub async fn fetch_body(&self, url: &str, headers: &HeaderSet) -> Result<String> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .map_err(|source| ScraperError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("GET {} -> {}", url, status.as_u16());
        } else {
            tracing::warn!("GET {} returned HTTP {}, parsing body anyway", url, status.as_u16());
        }

        response.text().await.map_err(|source| ScraperError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches a URL and parses the body into a document tree
    ///
    /// Non-HTML or empty bodies produce a degenerate document rather than an
    /// error.
    pub async fn fetch_document(&self, url: &str, headers: &HeaderSet) -> Result<Html> {
        let body = self.fetch_body(url, headers).await?;
        Ok(Html::parse_document(&body))
    }
}
