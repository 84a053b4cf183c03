//! Payload models and record normalization
//!
//! Typed view of one search response page plus the flat `Record` that
//! lands in the CSV. `public_metrics` and its four counters are
//! required fields on purpose: a payload without them signals an API
//! shape change and must fail the run rather than default silently.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column order of the tabular output
pub const COLUMNS: [&str; 9] = [
    "id",
    "text",
    "hashtags",
    "created_at",
    "geo",
    "like_count",
    "quote_count",
    "reply_count",
    "retweet_count",
];

/// One page of search results as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Matching tweets; absent on empty pages
    #[serde(default)]
    pub data: Vec<RawTweet>,
    /// Pagination metadata
    #[serde(default)]
    pub meta: PageMeta,
}

impl SearchPage {
    /// Parse a page from a raw JSON payload
    pub fn from_value(payload: &Value) -> Result<Self> {
        serde_json::from_value(payload.clone())
            .map_err(|e| Error::shape(format!("search page did not match expected shape: {e}")))
    }

    /// Cursor for the next page, if the API reports one
    pub fn next_token(&self) -> Option<&str> {
        self.meta.next_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Pull the next-page cursor straight out of a raw payload
///
/// Used by the run loop so cursor extraction does not depend on the
/// sink having normalized the page.
pub fn extract_next_token(payload: &Value) -> Option<String> {
    payload
        .pointer("/meta/next_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Pagination metadata from the `meta` object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    /// Opaque cursor for the next page; absence means exhaustion
    pub next_token: Option<String>,
    /// Number of results on this page, when reported
    pub result_count: Option<u64>,
}

/// One tweet as returned by the API, before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawTweet {
    pub id: String,
    pub text: String,
    pub created_at: String,
    /// Geo information; arbitrary object, rendered as JSON when present
    pub geo: Option<Value>,
    pub entities: Option<Entities>,
    /// Engagement counters; required, missing counters abort the run
    pub public_metrics: PublicMetrics,
}

/// Entity annotations attached to a tweet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
}

/// A single hashtag entity
#[derive(Debug, Clone, Deserialize)]
pub struct HashtagEntity {
    pub tag: String,
}

/// Engagement counters from `public_metrics`
#[derive(Debug, Clone, Deserialize)]
pub struct PublicMetrics {
    pub like_count: u64,
    pub quote_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
}

/// One normalized record, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: String,
    pub text: String,
    /// Space-joined hashtag list; empty when the tweet has none
    pub hashtags: String,
    pub created_at: String,
    /// JSON-rendered geo object; empty when absent
    pub geo: String,
    pub like_count: u64,
    pub quote_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
}

impl From<RawTweet> for Record {
    fn from(raw: RawTweet) -> Self {
        let hashtags = raw
            .entities
            .map(|e| {
                e.hashtags
                    .iter()
                    .map(|h| h.tag.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let geo = match raw.geo {
            Some(Value::Null) | None => String::new(),
            Some(value) => value.to_string(),
        };

        Self {
            id: raw.id,
            text: raw.text,
            hashtags,
            created_at: raw.created_at,
            geo,
            like_count: raw.public_metrics.like_count,
            quote_count: raw.public_metrics.quote_count,
            reply_count: raw.public_metrics.reply_count,
            retweet_count: raw.public_metrics.retweet_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_normalize_minimal_tweet() {
        let payload = json!({
            "data": [{
                "id": "1",
                "text": "hi",
                "created_at": "t",
                "public_metrics": {
                    "like_count": 1,
                    "quote_count": 0,
                    "reply_count": 0,
                    "retweet_count": 2
                }
            }]
        });

        let page = SearchPage::from_value(&payload).unwrap();
        assert_eq!(page.data.len(), 1);
        assert!(page.next_token().is_none());

        let record = Record::from(page.data[0].clone());
        assert_eq!(
            record,
            Record {
                id: "1".to_string(),
                text: "hi".to_string(),
                hashtags: String::new(),
                created_at: "t".to_string(),
                geo: String::new(),
                like_count: 1,
                quote_count: 0,
                reply_count: 0,
                retweet_count: 2,
            }
        );
    }

    #[test]
    fn test_normalize_hashtags_and_geo() {
        let payload = json!({
            "data": [{
                "id": "42",
                "text": "stay home",
                "created_at": "2020-03-15T12:00:00.000Z",
                "geo": {"place_id": "abc123"},
                "entities": {
                    "hashtags": [{"tag": "covid19"}, {"tag": "pandemic"}]
                },
                "public_metrics": {
                    "like_count": 10,
                    "quote_count": 1,
                    "reply_count": 2,
                    "retweet_count": 3
                }
            }],
            "meta": {"next_token": "b26v89c19zqg8o3f", "result_count": 1}
        });

        let page = SearchPage::from_value(&payload).unwrap();
        assert_eq!(page.next_token(), Some("b26v89c19zqg8o3f"));
        assert_eq!(page.meta.result_count, Some(1));

        let record = Record::from(page.data[0].clone());
        assert_eq!(record.hashtags, "covid19 pandemic");
        assert_eq!(record.geo, r#"{"place_id":"abc123"}"#);
    }

    #[test]
    fn test_missing_metrics_fails_loudly() {
        let payload = json!({
            "data": [{"id": "1", "text": "hi", "created_at": "t"}]
        });
        let err = SearchPage::from_value(&payload).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));

        // A partially filled metrics object is just as fatal
        let payload = json!({
            "data": [{
                "id": "1",
                "text": "hi",
                "created_at": "t",
                "public_metrics": {"like_count": 1}
            }]
        });
        assert!(SearchPage::from_value(&payload).is_err());
    }

    #[test]
    fn test_page_without_data_is_empty() {
        let payload = json!({"meta": {"result_count": 0}});
        let page = SearchPage::from_value(&payload).unwrap();
        assert!(page.data.is_empty());
        assert!(page.next_token().is_none());
    }

    #[test]
    fn test_empty_next_token_means_exhausted() {
        let payload = json!({"meta": {"next_token": ""}});
        let page = SearchPage::from_value(&payload).unwrap();
        assert!(page.next_token().is_none());
        assert!(extract_next_token(&payload).is_none());
    }

    #[test]
    fn test_extract_next_token_from_raw_payload() {
        let payload = json!({"data": [], "meta": {"next_token": "abc"}});
        assert_eq!(extract_next_token(&payload), Some("abc".to_string()));
        assert_eq!(extract_next_token(&json!({"meta": {}})), None);
        assert_eq!(extract_next_token(&json!({})), None);
    }
}
