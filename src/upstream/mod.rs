//! Upstream Module
//!
//! The scraping backend client and the site pages each route asks it for.

mod client;
mod targets;

pub use client::ScraperClient;
pub use targets::ScrapeTarget;
