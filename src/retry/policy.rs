//! Retry policy implementation

use super::parse_reset;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::time::Duration;

/// Outcome of parsing the rate-limit reset header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetHeader {
    /// Header present and parsed to an instant
    Present(DateTime<Utc>),
    /// Header not sent by the server
    Missing,
    /// Header sent but not an epoch-seconds value
    Unparsable(String),
}

impl ResetHeader {
    /// Whether the fallback cooldown applies (header unusable)
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// A failed fetch, as seen by the policy
#[derive(Debug)]
pub enum FailureKind<'a> {
    /// HTTP 429 with the response headers
    RateLimited { headers: &'a HeaderMap },
    /// Any other non-200 status
    Status { status: u16 },
    /// Network-level failure before a status was received
    Transport,
}

/// What the run loop should do about a failed fetch
///
/// Every variant retries the same cursor; pages are never skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Sleep until the server-specified reset time plus margin.
    /// Does not count toward the consecutive-failure threshold.
    WaitForReset { wait: Duration },
    /// Reset header missing or unparsable: fixed cooldown, counted
    /// as a consecutive failure.
    Cooldown {
        wait: Duration,
        condition: ResetHeader,
    },
    /// Transient server or network error: fixed backoff, counted.
    Backoff { wait: Duration },
    /// Consecutive-failure threshold reached; the operator decides
    /// whether to keep retrying.
    Escalate { failures: u32 },
}

/// Retry policy constants
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Safety margin added past the server reset time
    pub reset_margin: Duration,
    /// Cooldown when a 429 carries no usable reset header
    pub rate_limit_fallback: Duration,
    /// Backoff for other failures
    pub transient_backoff: Duration,
    /// Consecutive counted failures before operator escalation
    pub max_consecutive_failures: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            reset_margin: Duration::from_secs(5),
            rate_limit_fallback: Duration::from_secs(180),
            transient_backoff: Duration::from_secs(300),
            max_consecutive_failures: 10,
        }
    }
}

impl RetryPolicy {
    /// Decide how to handle a failed fetch
    ///
    /// `consecutive_failures` is the count before this failure; the
    /// returned decision reflects whether this one is counted. Pure:
    /// the caller supplies `now` and performs any sleeping.
    pub fn decide(
        &self,
        kind: &FailureKind<'_>,
        consecutive_failures: u32,
        now: DateTime<Utc>,
    ) -> Decision {
        match kind {
            FailureKind::RateLimited { headers } => {
                let reset = parse_reset(headers);
                match reset {
                    ResetHeader::Present(instant) => Decision::WaitForReset {
                        wait: self.wait_until(instant, now),
                    },
                    condition => {
                        let failures = consecutive_failures + 1;
                        if failures >= self.max_consecutive_failures {
                            Decision::Escalate { failures }
                        } else {
                            Decision::Cooldown {
                                wait: self.rate_limit_fallback,
                                condition,
                            }
                        }
                    }
                }
            }
            FailureKind::Status { .. } | FailureKind::Transport => {
                let failures = consecutive_failures + 1;
                if failures >= self.max_consecutive_failures {
                    Decision::Escalate { failures }
                } else {
                    Decision::Backoff {
                        wait: self.transient_backoff,
                    }
                }
            }
        }
    }

    /// Time to sleep so we wake at `reset` plus the safety margin
    ///
    /// A reset already in the past still gets the margin, so a stale
    /// header never produces a zero-length busy retry.
    fn wait_until(&self, reset: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
        let until_reset = (reset - now).to_std().unwrap_or_default();
        until_reset + self.reset_margin
    }
}
