//! Scraper Gateway - caching, rate-limited front for a scraping backend
//!
//! Forwards Amazon and eBay lookups to the backend, answering repeated
//! requests from a bounded TTL cache and limiting each client to a fixed
//! number of requests per window.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;
pub mod upstream;

#[cfg(test)]
mod test_support;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{GatewayError, Result};
pub use tasks::spawn_cleanup_task;
