//! API Module
//!
//! HTTP handlers and routing for the gateway.
//!
//! # Endpoints
//! - `GET /` - Welcome text
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `GET /amazon/...`, `GET /ebay/...` - Cached scrape routes

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
