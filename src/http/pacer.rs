//! Request pacing
//!
//! Token bucket via the governor crate. Replaces an explicit sleep
//! between pages: waiting on the pacer before each request caps the
//! request rate regardless of how long the previous page took.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Configuration for the page pacer
#[derive(Debug, Clone)]
pub struct PacerConfig {
    /// Maximum requests per second against the search endpoint
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for PacerConfig {
    // Full-archive search allows 1 request per second per app
    fn default() -> Self {
        Self {
            requests_per_second: 1,
            burst_size: 1,
        }
    }
}

impl PacerConfig {
    /// Create a pacer config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket pacer for page requests
#[derive(Clone)]
pub struct Pacer {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl Pacer {
    /// Create a pacer with the given config
    pub fn new(config: &PacerConfig) -> Self {
        let one = NonZeroU32::new(1).unwrap();
        let quota =
            Quota::per_second(NonZeroU32::new(config.requests_per_second).unwrap_or(one))
                .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(one));

        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Wait until the next request may be issued
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Check whether a request could be issued immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(&PacerConfig::default())
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer").finish()
    }
}
