//! Rate Limiter Module
//!
//! Fixed-window per-client admission control, applied in front of every
//! route.

mod fixed_window;
mod middleware;

pub use fixed_window::{Quota, RateLimiter, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};
pub use middleware::{
    client_identity, enforce_rate_limit, RATELIMIT_LIMIT, RATELIMIT_REMAINING, RATELIMIT_RESET,
};
