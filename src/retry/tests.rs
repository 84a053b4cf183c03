//! Tests for the retry policy

use super::*;
use chrono::TimeZone;
use reqwest::header::HeaderValue;

fn headers_with_reset(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(RESET_HEADER, HeaderValue::from_str(value).unwrap());
    headers
}

// ============================================================================
// Reset Header Parsing
// ============================================================================

#[test]
fn test_parse_reset_present() {
    let headers = headers_with_reset("1614556800");
    let expected = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
    assert_eq!(parse_reset(&headers), ResetHeader::Present(expected));
}

#[test]
fn test_parse_reset_missing() {
    let headers = HeaderMap::new();
    assert_eq!(parse_reset(&headers), ResetHeader::Missing);
}

#[test]
fn test_parse_reset_unparsable() {
    let headers = headers_with_reset("soon");
    assert_eq!(
        parse_reset(&headers),
        ResetHeader::Unparsable("soon".to_string())
    );
}

#[test]
fn test_parse_reset_tolerates_whitespace() {
    let headers = headers_with_reset(" 1614556800 ");
    assert!(parse_reset(&headers).is_usable());
}

// ============================================================================
// Rate-Limit Decisions
// ============================================================================

#[test]
fn test_rate_limit_with_valid_reset_waits_until_margin() {
    let policy = RetryPolicy::default();
    let now = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
    let reset_epoch = now.timestamp() + 120;
    let headers = headers_with_reset(&reset_epoch.to_string());

    let decision = policy.decide(&FailureKind::RateLimited { headers: &headers }, 0, now);
    assert_eq!(
        decision,
        Decision::WaitForReset {
            wait: Duration::from_secs(120) + policy.reset_margin
        }
    );
}

#[test]
fn test_rate_limit_reset_in_past_still_waits_margin() {
    let policy = RetryPolicy::default();
    let now = Utc.with_ymd_and_hms(2021, 3, 1, 0, 10, 0).unwrap();
    let reset_epoch = now.timestamp() - 60;
    let headers = headers_with_reset(&reset_epoch.to_string());

    let decision = policy.decide(&FailureKind::RateLimited { headers: &headers }, 5, now);
    assert_eq!(
        decision,
        Decision::WaitForReset {
            wait: policy.reset_margin
        }
    );
}

#[test]
fn test_rate_limit_missing_header_falls_back_and_counts() {
    let policy = RetryPolicy::default();
    let headers = HeaderMap::new();

    let decision = policy.decide(&FailureKind::RateLimited { headers: &headers }, 0, Utc::now());
    assert_eq!(
        decision,
        Decision::Cooldown {
            wait: policy.rate_limit_fallback,
            condition: ResetHeader::Missing,
        }
    );
}

#[test]
fn test_rate_limit_unparsable_header_reported_separately() {
    let policy = RetryPolicy::default();
    let headers = headers_with_reset("not-a-timestamp");

    let decision = policy.decide(&FailureKind::RateLimited { headers: &headers }, 0, Utc::now());
    assert_eq!(
        decision,
        Decision::Cooldown {
            wait: policy.rate_limit_fallback,
            condition: ResetHeader::Unparsable("not-a-timestamp".to_string()),
        }
    );
}

// ============================================================================
// Transient Failures and Escalation
// ============================================================================

#[test]
fn test_server_error_backs_off() {
    let policy = RetryPolicy::default();
    let decision = policy.decide(&FailureKind::Status { status: 503 }, 0, Utc::now());
    assert_eq!(
        decision,
        Decision::Backoff {
            wait: policy.transient_backoff
        }
    );
}

#[test]
fn test_transport_error_backs_off() {
    let policy = RetryPolicy::default();
    let decision = policy.decide(&FailureKind::Transport, 3, Utc::now());
    assert_eq!(
        decision,
        Decision::Backoff {
            wait: policy.transient_backoff
        }
    );
}

#[test]
fn test_tenth_consecutive_failure_escalates() {
    let policy = RetryPolicy::default();

    // Nine failures so far: this one makes ten
    let decision = policy.decide(&FailureKind::Status { status: 500 }, 9, Utc::now());
    assert_eq!(decision, Decision::Escalate { failures: 10 });

    // Eight so far: still backing off
    let decision = policy.decide(&FailureKind::Status { status: 500 }, 8, Utc::now());
    assert!(matches!(decision, Decision::Backoff { .. }));
}

#[test]
fn test_unusable_reset_header_counts_toward_escalation() {
    let policy = RetryPolicy::default();
    let headers = HeaderMap::new();

    let decision = policy.decide(&FailureKind::RateLimited { headers: &headers }, 9, Utc::now());
    assert_eq!(decision, Decision::Escalate { failures: 10 });
}

#[test]
fn test_valid_reset_header_never_escalates() {
    let policy = RetryPolicy::default();
    let now = Utc::now();
    let headers = headers_with_reset(&(now.timestamp() + 30).to_string());

    let decision = policy.decide(&FailureKind::RateLimited { headers: &headers }, 9, now);
    assert!(matches!(decision, Decision::WaitForReset { .. }));
}
