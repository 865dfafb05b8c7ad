//! Scraper Client Module
//!
//! HTTP client for the scraping backend.

use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::{debug, error};
use url::Url;

use crate::error::{GatewayError, Result};
use crate::models::ScrapePayload;
use crate::upstream::ScrapeTarget;

// == Scraper Client ==
/// Client for the scraping backend.
///
/// Holds one pooled `reqwest::Client` for the life of the process. Every
/// call asks the backend to scrape a [`ScrapeTarget`] with auto-parsing on,
/// so the backend answers with JSON.
pub struct ScraperClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl ScraperClient {
    /// Creates a client for the backend at `base_url` using `api_key` unless
    /// a request supplies its own.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GatewayError::Config(format!("Invalid scraper base URL '{}': {}", base_url, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Backend URL for scraping `target`, authenticated with `api_key` when
    /// given, the configured credential otherwise.
    pub fn request_url(&self, target: &ScrapeTarget, api_key: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", api_key.unwrap_or(&self.api_key))
            .append_pair("autoparse", "true")
            .append_pair("url", &target.url());
        url
    }

    /// Makes exactly one backend call for `target` and returns its JSON body
    /// unchanged.
    ///
    /// Transport errors, timeouts, non-2xx statuses and non-JSON bodies are
    /// all failures.
    pub async fn fetch(&self, target: &ScrapeTarget, api_key: Option<&str>) -> Result<ScrapePayload> {
        let url = self.request_url(target, api_key);
        debug!(kind = target.kind(), target = %target, "Calling scraping backend");

        // reqwest errors carry the request URL, which holds the credential.
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Scraping backend request failed: {}", e);
                if e.is_timeout() {
                    GatewayError::Upstream("Request to scraping backend timed out".to_string())
                } else {
                    GatewayError::Upstream(format!("Request to scraping backend failed: {}", e))
                }
            })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read scraping backend response: {}", e);
            GatewayError::Upstream(format!("Failed to read scraping backend response: {}", e))
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            error!("Scraping backend returned status {}: {}", status, snippet);
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        ScrapePayload::from_json(body).map_err(|e| {
            error!("Scraping backend returned invalid JSON: {}", e);
            GatewayError::Upstream(format!("Scraping backend returned invalid JSON: {}", e))
        })
    }
}

// == Helpers ==
fn truncate_body(body: &[u8]) -> String {
    const MAX: usize = 500;
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...[truncated]", &text[..cut]),
        None => text.into_owned(),
    }
}
