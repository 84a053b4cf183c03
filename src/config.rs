//! Run configuration
//!
//! Everything the collector needs is passed in explicitly at construction.
//! There is no ambient credential or endpoint state.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default search endpoint (Twitter v2 full-archive search)
pub const DEFAULT_ENDPOINT: &str = "https://api.twitter.com/2/tweets/search/all";

/// Fields requested for every tweet
pub const TWEET_FIELDS: &str = "created_at,geo,text,public_metrics";

/// Configuration for one collection run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Search endpoint URL
    pub endpoint: String,
    /// Bearer token for authorization
    pub bearer_token: String,
    /// Search query (passed as the `query` parameter)
    pub query: String,
    /// Records per page (`max_results` parameter)
    pub page_size: u32,
    /// Extra query parameters, passed through verbatim when non-empty
    pub extra_params: Vec<(String, String)>,
    /// Maximum pages to fetch; 0 means no limit
    pub max_pages: u32,
    /// Append every raw page payload to a .raw.jsonl file
    pub archive_raw: bool,
    /// Directory for output files
    pub output_dir: PathBuf,
}

impl RunConfig {
    /// Create a config for the given query with defaults everywhere else
    pub fn new(query: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bearer_token: bearer_token.into(),
            query: query.into(),
            page_size: 100,
            extra_params: Vec::new(),
            max_pages: 0,
            archive_raw: false,
            output_dir: PathBuf::from("."),
        }
    }

    /// Set the endpoint URL
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Add an extra request parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((key.into(), value.into()));
        self
    }

    /// Set the page limit (0 = unlimited)
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Enable raw payload archival
    #[must_use]
    pub fn with_archive_raw(mut self, enabled: bool) -> Self {
        self.archive_raw = enabled;
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::config("query must not be empty"));
        }
        if self.bearer_token.is_empty() {
            return Err(Error::MissingBearerToken);
        }
        if self.page_size == 0 {
            return Err(Error::config("page size must be at least 1"));
        }
        url::Url::parse(&self.endpoint)?;
        Ok(())
    }

    /// Render the extra parameters for the run description
    pub fn params_summary(&self) -> String {
        if self.extra_params.is_empty() {
            return "{}".to_string();
        }
        let pairs: Vec<String> = self
            .extra_params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}
