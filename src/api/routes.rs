//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{extract::Request, middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    amazon_offers, amazon_product, amazon_reviews, amazon_search, ebay_category, ebay_product,
    ebay_search, ebay_seller_items, health_handler, stats_handler, welcome_handler, AppState,
};
use crate::cache::{cache_responses, CachePolicy};
use crate::limiter::enforce_rate_limit;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Welcome text
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Cache statistics
/// - `GET /amazon/products/:product_id[/reviews|/offers]`, `GET /amazon/search/:query`
/// - `GET /ebay/products/:product_id`, `GET /ebay/seller/:seller_id/items`,
///   `GET /ebay/search/:query`, `GET /ebay/category/:category_id`
///
/// # Middleware (outermost first)
/// - Tracing: Logs all requests by method and path
/// - CORS: Allows any origin
/// - Rate limit: Applies to every route
/// - Cache: Scrape routes only
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache_policy = CachePolicy::new(state.cache.clone(), state.cache_ttl);

    let scrape_routes = Router::new()
        .route("/amazon/products/:product_id", get(amazon_product))
        .route("/amazon/products/:product_id/reviews", get(amazon_reviews))
        .route("/amazon/products/:product_id/offers", get(amazon_offers))
        .route("/amazon/search/:query", get(amazon_search))
        .route("/ebay/products/:product_id", get(ebay_product))
        .route("/ebay/seller/:seller_id/items", get(ebay_seller_items))
        .route("/ebay/search/:query", get(ebay_search))
        .route("/ebay/category/:category_id", get(ebay_category))
        .route_layer(middleware::from_fn_with_state(cache_policy, cache_responses));

    Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .merge(scrape_routes)
        .layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            enforce_rate_limit,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                // Path only: the query may carry a client api_key.
                tracing::debug_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path()
                )
            }),
        )
        .with_state(state)
}
