//! Cache Middleware
//!
//! Axum middleware that answers repeated `GET` requests from the shared cache
//! and stores fresh successful responses on the way out.

use std::time::Duration;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::cache::{CacheKey, CacheStatus, ResponseCache, MAX_BODY_SIZE};
use crate::error::GatewayError;

/// Response header reporting whether the body came from the cache.
pub static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

// == Cached Response ==
/// A buffered successful response, replayed byte-for-byte on a hit.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
}

impl CachedResponse {
    /// Buffers `response`, returning it as an error response if the body
    /// cannot be read.
    pub async fn buffer(response: Response) -> Result<Self, Response> {
        let (parts, body) = response.into_parts();
        let body = to_bytes(body, MAX_BODY_SIZE).await.map_err(|e| {
            warn!("Failed to buffer downstream response: {}", e);
            GatewayError::Internal("Failed to read upstream response".to_string()).into_response()
        })?;

        Ok(Self {
            status: parts.status,
            content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
            body,
        })
    }

    /// Rebuilds the HTTP response, tagging it with the cache outcome.
    pub fn into_response_with(self, cache_status: CacheStatus) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if let Some(content_type) = self.content_type {
            headers.insert(header::CONTENT_TYPE, content_type);
        }
        headers.insert(
            X_CACHE.clone(),
            HeaderValue::from_static(cache_status.as_str()),
        );
        response
    }
}

// == Cache Policy ==
/// State for [`cache_responses`]: which cache to use and for how long
/// entries of the wrapped routes live.
#[derive(Clone)]
pub struct CachePolicy {
    pub cache: ResponseCache<CachedResponse>,
    pub ttl: Duration,
}

impl CachePolicy {
    pub fn new(cache: ResponseCache<CachedResponse>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }
}

// == Middleware ==
/// Serves the request from the cache when possible, otherwise runs the
/// wrapped handler and stores its response if it succeeded.
///
/// Non-2xx responses are returned as-is and never stored.
pub async fn cache_responses(
    State(policy): State<CachePolicy>,
    key: CacheKey,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let result = policy
        .cache
        .get_or_fetch(key, policy.ttl, || async move {
            let response = next.run(request).await;
            if !response.status().is_success() {
                return Err(response);
            }
            CachedResponse::buffer(response).await
        })
        .await;

    match result {
        Ok((cached, status)) => cached.into_response_with(status),
        Err(response) => response,
    }
}
