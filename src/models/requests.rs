//! Request DTOs for the gateway API
//!
//! Defines the query parameters accepted by the scrape routes.

use serde::Deserialize;

/// Query parameters accepted by every scrape route.
///
/// # Fields
/// - `api_key`: Optional backend credential overriding the configured one
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeParams {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ScrapeParams {
    /// The client-supplied credential, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
