//! Fixed Window Module
//!
//! Fixed-window request counting per client.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{GatewayError, Result};

// == Public Constants ==
/// Default requests admitted per client per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

// == Window ==
/// Counter for one client's current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

// == Quota ==
/// Budget left after an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets
    pub reset_after: Duration,
}

// == Rate Limiter ==
/// Admits up to `max_requests` per client in each window.
///
/// A client's window opens with its first request and lasts `window`; the
/// count starts over once it has elapsed.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    // == Check ==
    /// Counts one request from `client`, rejecting it once the budget for
    /// the current window is spent.
    pub async fn check(&self, client: &str) -> Result<Quota> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let window = windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.window {
            debug!(client = %client, "Rate limit window reset");
            window.started_at = now;
            window.count = 0;
        }

        let reset_after = self
            .window
            .saturating_sub(now.duration_since(window.started_at));

        if window.count >= self.max_requests {
            warn!(
                client = %client,
                limit = self.max_requests,
                retry_after_secs = reset_after.as_secs(),
                "Rate limit exceeded"
            );
            return Err(GatewayError::RateLimited {
                retry_after: reset_after,
            });
        }

        window.count += 1;
        Ok(Quota {
            limit: self.max_requests,
            remaining: self.max_requests - window.count,
            reset_after,
        })
    }

    // == Sweep ==
    /// Drops windows that have run out, returning how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);
        before - windows.len()
    }

    /// Number of clients with an open window.
    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}
