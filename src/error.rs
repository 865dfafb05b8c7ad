//! Error types for the gateway
//!
//! Provides unified error handling using thiserror. Every variant renders as
//! a JSON `{"error": <message>}` body.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Gateway Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The scraping backend could not be reached, timed out, or sent an
    /// unusable body
    #[error("{0}")]
    Upstream(String),

    /// The scraping backend answered with a non-success status
    #[error("Request failed with status code {status}")]
    UpstreamStatus { status: u16, body: String },

    /// The client exhausted its request budget for the current window
    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: Duration },

    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Upstream(_)
            | GatewayError::UpstreamStatus { .. }
            | GatewayError::Config(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let retry_after = match &self {
            GatewayError::RateLimited { retry_after } => Some(whole_seconds_ceil(*retry_after)),
            _ => None,
        };

        let mut response = (status, Json(ErrorResponse::new(self.to_string()))).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Whole seconds, rounded up, never below one.
fn whole_seconds_ceil(duration: Duration) -> u64 {
    let secs = duration
        .as_secs()
        .saturating_add(u64::from(duration.subsec_nanos() > 0));
    secs.max(1)
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;
