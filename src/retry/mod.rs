//! Retry policy
//!
//! Pure decision logic for the run loop: maps a failed fetch plus the
//! consecutive-failure count to a wait-and-retry or escalate decision.
//! No sleeping happens here; the engine owns the clock and the sleeps,
//! both behind injectable traits so tests never wait for real time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::time::Duration;

mod policy;

pub use policy::{Decision, FailureKind, ResetHeader, RetryPolicy};

/// Header carrying the epoch-seconds reset time on 429 responses
pub const RESET_HEADER: &str = "x-rate-limit-reset";

/// Parse the rate-limit reset header from a 429 response
///
/// "Header missing" and "header unparsable" are distinct conditions and
/// are reported as such instead of being folded into one fallback.
pub fn parse_reset(headers: &HeaderMap) -> ResetHeader {
    let Some(value) = headers.get(RESET_HEADER) else {
        return ResetHeader::Missing;
    };

    let raw = String::from_utf8_lossy(value.as_bytes()).into_owned();
    match raw.trim().parse::<i64>().ok().and_then(|secs| {
        DateTime::<Utc>::from_timestamp(secs, 0)
    }) {
        Some(instant) => ResetHeader::Present(instant),
        None => ResetHeader::Unparsable(raw),
    }
}

/// Wall clock, injectable for tests
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sleep capability, injectable for tests
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed sleeper
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests;
