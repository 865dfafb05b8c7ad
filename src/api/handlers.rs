//! API Handlers
//!
//! HTTP request handlers for the gateway endpoints. Scrape handlers are thin
//! forwarders: they name the page to scrape and make one backend call.
//! Caching happens around them in [`crate::cache::cache_responses`].

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::{CachedResponse, ResponseCache};
use crate::config::Config;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::models::{HealthResponse, ScrapeParams, ScrapePayload, StatsResponse};
use crate::upstream::{ScrapeTarget, ScraperClient};

/// Plain-text greeting served at `/`.
pub const WELCOME_MESSAGE: &str =
    "Welcome to Amazon and eBay Scraper API! Created By Tolgahan Bora";

/// Application state shared across all handlers.
///
/// Built once at startup; every field is a cheap handle onto process-wide
/// state.
#[derive(Clone)]
pub struct AppState {
    /// Response cache shared by all scrape routes
    pub cache: ResponseCache<CachedResponse>,
    /// Scraping backend client
    pub scraper: Arc<ScraperClient>,
    /// Per-client admission control
    pub limiter: Arc<RateLimiter>,
    /// Lifetime of cached scrape responses
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(
        cache: ResponseCache<CachedResponse>,
        scraper: ScraperClient,
        limiter: RateLimiter,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            scraper: Arc::new(scraper),
            limiter: Arc::new(limiter),
            cache_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let scraper = ScraperClient::new(
            &config.scraper_base_url,
            config.scraper_api_key.clone(),
            config.upstream_timeout(),
        )?;
        Ok(Self::new(
            ResponseCache::with_capacity(config.cache_max_entries),
            scraper,
            RateLimiter::new(config.rate_limit_max, config.rate_limit_window()),
            config.cache_ttl(),
        ))
    }
}

async fn forward(state: &AppState, target: ScrapeTarget, params: &ScrapeParams) -> Result<ScrapePayload> {
    info!(kind = target.kind(), "Fetching from scraping backend");
    state.scraper.fetch(&target, params.api_key()).await
}

/// Handler for GET /amazon/products/:product_id
pub async fn amazon_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::AmazonProduct { product_id }, &params).await
}

/// Handler for GET /amazon/products/:product_id/reviews
pub async fn amazon_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::AmazonReviews { product_id }, &params).await
}

/// Handler for GET /amazon/products/:product_id/offers
pub async fn amazon_offers(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::AmazonOffers { product_id }, &params).await
}

/// Handler for GET /amazon/search/:query
pub async fn amazon_search(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::AmazonSearch { query }, &params).await
}

/// Handler for GET /ebay/products/:product_id
pub async fn ebay_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::EbayProduct { product_id }, &params).await
}

/// Handler for GET /ebay/seller/:seller_id/items
pub async fn ebay_seller_items(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::EbaySellerItems { seller_id }, &params).await
}

/// Handler for GET /ebay/search/:query
pub async fn ebay_search(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::EbaySearch { query }, &params).await
}

/// Handler for GET /ebay/category/:category_id
pub async fn ebay_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<ScrapePayload> {
    forward(&state, ScrapeTarget::EbayCategory { category_id }, &params).await
}

/// Handler for GET /
pub async fn welcome_handler() -> &'static str {
    WELCOME_MESSAGE
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    let capacity = state.cache.capacity().await;
    Json(StatsResponse::new(&stats, capacity))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(base_url: &str) -> AppState {
        AppState::new(
            ResponseCache::with_capacity(100),
            ScraperClient::new(base_url, "configured-key", Duration::from_secs(5)).unwrap(),
            RateLimiter::default(),
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn test_handler_forwards_client_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("api_key", "client-key"))
            .and(query_param("url", "https://www.ebay.com/itm/42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"title":"Lamp"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let params = ScrapeParams {
            api_key: Some("client-key".to_string()),
        };
        let payload = ebay_product(
            State(test_state(&server.uri())),
            Path("42".to_string()),
            Query(params),
        )
        .await
        .unwrap();

        assert_eq!(payload.as_bytes(), br#"{"title":"Lamp"}"#);
    }

    #[tokio::test]
    async fn test_handler_surfaces_backend_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = amazon_search(
            State(test_state(&server.uri())),
            Path("tv".to_string()),
            Query(ScrapeParams::default()),
        )
        .await;

        assert!(matches!(
            result,
            Err(GatewayError::UpstreamStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state("http://127.0.0.1:9");

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_welcome_handler() {
        assert_eq!(
            welcome_handler().await,
            "Welcome to Amazon and eBay Scraper API! Created By Tolgahan Bora"
        );
    }
}
