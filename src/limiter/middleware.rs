//! Rate Limit Middleware
//!
//! Axum middleware applying the rate limiter to every request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::RateLimiter;

// == Response Headers ==
pub static RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub static RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub static RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

// == Client Identity ==
/// Identity used when the peer address is unavailable.
const UNKNOWN_CLIENT: &str = "unknown";

/// Client identity for rate limiting: the peer IP address.
pub fn client_identity(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

// == Middleware ==
/// Rejects over-budget clients with 429 before any routing or caching
/// happens, and reports the remaining budget on admitted responses.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_identity(&request);

    let quota = match limiter.check(&client).await {
        Ok(quota) => quota,
        Err(err) => return err.into_response(),
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(RATELIMIT_LIMIT.clone(), HeaderValue::from(quota.limit));
    headers.insert(RATELIMIT_REMAINING.clone(), HeaderValue::from(quota.remaining));
    headers.insert(
        RATELIMIT_RESET.clone(),
        HeaderValue::from(quota.reset_after.as_secs()),
    );
    response
}
