//! Search API client
//!
//! One GET per call against the configured search endpoint, bearer
//! authorized. Status interpretation lives here; what to do about a
//! bad status is decided by the retry policy.

use crate::config::{RunConfig, TWEET_FIELDS};
use crate::error::Result;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Classified result of a single page fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 200 with a decoded JSON payload
    Page { payload: Value },
    /// HTTP 429; headers carried for reset-time extraction
    RateLimited { headers: HeaderMap },
    /// Any other status
    Failed { status: u16, body: String },
}

/// Client for the paged search endpoint
pub struct SearchClient {
    client: Client,
    endpoint: String,
    bearer_token: String,
    base_params: Vec<(String, String)>,
}

impl SearchClient {
    /// Create a client from the run configuration
    ///
    /// Deliberately no request timeout: the only patience that applies
    /// to a call is the caller's own.
    pub fn new(config: &RunConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("tweetsweep/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            bearer_token: config.bearer_token.clone(),
            base_params: Self::base_params(config),
        })
    }

    /// Query parameters shared by every page of the run
    fn base_params(config: &RunConfig) -> Vec<(String, String)> {
        let mut params = vec![
            ("query".to_string(), config.query.clone()),
            ("max_results".to_string(), config.page_size.to_string()),
            ("tweet.fields".to_string(), TWEET_FIELDS.to_string()),
        ];
        for (key, value) in &config.extra_params {
            if !value.is_empty() {
                params.push((key.clone(), value.clone()));
            }
        }
        params
    }

    /// Parameters for one page: the base set, plus the cursor after page one
    pub fn page_params(&self, cursor: Option<&str>) -> Vec<(String, String)> {
        let mut params = self.base_params.clone();
        if let Some(token) = cursor {
            params.push(("next_token".to_string(), token.to_string()));
        }
        params
    }

    /// Fetch one page, classifying the response by status
    ///
    /// Transport-level failures surface as `Error::Http`.
    pub async fn fetch_page(&self, cursor: Option<&str>) -> Result<FetchOutcome> {
        let params = self.page_params(cursor);
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.bearer_token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), cursor = ?cursor, "fetched page");

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(FetchOutcome::RateLimited {
                headers: response.headers().clone(),
            });
        }

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Ok(FetchOutcome::Failed {
                status: status.as_u16(),
                body,
            });
        }

        // Parse from text rather than response.json() so a non-JSON
        // body surfaces as JsonParse, which the engine propagates,
        // instead of a retryable transport error.
        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;
        Ok(FetchOutcome::Page { payload })
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
