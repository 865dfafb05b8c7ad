//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS};
use crate::error::{GatewayError, Result};

/// Default scraping backend endpoint
pub const DEFAULT_SCRAPER_BASE_URL: &str = "http://api.scraperapi.com";

/// Upper bound for every duration setting (one year)
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Gateway configuration parameters.
///
/// Everything except the backend credential has a default.
#[derive(Clone)]
pub struct Config {
    /// Credential forwarded to the scraping backend
    pub scraper_api_key: String,
    /// Scraping backend endpoint
    pub scraper_base_url: String,
    /// Timeout for a single backend call in seconds
    pub upstream_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cached responses
    pub cache_max_entries: usize,
    /// Time-to-live of cached responses in seconds
    pub cache_ttl: u64,
    /// Requests admitted per client per window
    pub rate_limit_max: u32,
    /// Rate-limit window length in seconds
    pub rate_limit_window: u64,
    /// Background sweep interval in seconds, 0 disables the sweeper
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SCRAPER_API_KEY` - Backend credential (required)
    /// - `SCRAPER_BASE_URL` - Backend endpoint (default: http://api.scraperapi.com)
    /// - `UPSTREAM_TIMEOUT` - Backend call timeout in seconds (default: 60)
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached responses (default: 100)
    /// - `CACHE_TTL` - Cached response lifetime in seconds (default: 300)
    /// - `RATE_LIMIT_MAX` - Requests per client per window (default: 100)
    /// - `RATE_LIMIT_WINDOW` - Window length in seconds (default: 60)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds, 0 = off (default: 60)
    ///
    /// Duration settings above [`MAX_DURATION_SECS`] are rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// A missing or blank `SCRAPER_API_KEY` is an error. Other values that
    /// are absent or fail to parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let scraper_api_key = lookup("SCRAPER_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                GatewayError::Config("SCRAPER_API_KEY must be set to a non-empty value".to_string())
            })?;

        let config = Self {
            scraper_api_key,
            scraper_base_url: lookup("SCRAPER_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.scraper_base_url),
            upstream_timeout: parse_or(&lookup, "UPSTREAM_TIMEOUT", defaults.upstream_timeout),
            server_port: parse_or(&lookup, "PORT", defaults.server_port),
            cache_max_entries: parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl: parse_or(&lookup, "CACHE_TTL", defaults.cache_ttl),
            rate_limit_max: parse_or(&lookup, "RATE_LIMIT_MAX", defaults.rate_limit_max),
            rate_limit_window: parse_or(&lookup, "RATE_LIMIT_WINDOW", defaults.rate_limit_window),
            cleanup_interval: parse_or(&lookup, "CLEANUP_INTERVAL", defaults.cleanup_interval),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cache_max_entries == 0 {
            return Err(GatewayError::Config(
                "CACHE_MAX_ENTRIES must be at least 1".to_string(),
            ));
        }
        if self.rate_limit_window == 0 {
            return Err(GatewayError::Config(
                "RATE_LIMIT_WINDOW must be at least 1 second".to_string(),
            ));
        }
        let durations = [
            ("CACHE_TTL", self.cache_ttl),
            ("RATE_LIMIT_WINDOW", self.rate_limit_window),
            ("UPSTREAM_TIMEOUT", self.upstream_timeout),
            ("CLEANUP_INTERVAL", self.cleanup_interval),
        ];
        for (name, secs) in durations {
            if secs > MAX_DURATION_SECS {
                return Err(GatewayError::Config(format!(
                    "{} must be at most {} seconds",
                    name, MAX_DURATION_SECS
                )));
            }
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Sweep interval, or `None` when the sweeper is disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval > 0).then(|| Duration::from_secs(self.cleanup_interval))
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Defaults for everything but the credential, which is left empty.
impl Default for Config {
    fn default() -> Self {
        Self {
            scraper_api_key: String::new(),
            scraper_base_url: DEFAULT_SCRAPER_BASE_URL.to_string(),
            upstream_timeout: 60,
            server_port: 5000,
            cache_max_entries: DEFAULT_CAPACITY,
            cache_ttl: DEFAULT_TTL_SECS,
            rate_limit_max: 100,
            rate_limit_window: 60,
            cleanup_interval: 60,
        }
    }
}

// The credential stays out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("scraper_api_key", &"<redacted>")
            .field("scraper_base_url", &self.scraper_base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("server_port", &self.server_port)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("cache_ttl", &self.cache_ttl)
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("cleanup_interval", &self.cleanup_interval)
            .finish()
    }
}
