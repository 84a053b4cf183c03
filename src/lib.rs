//! # tweetsweep
//!
//! Sequential collector for the Twitter v2 full-archive search API.
//! Paginates a cursor-based search, normalizes returned tweets, and
//! persists them as CSV alongside run metadata, with rate-limit and
//! transient-error recovery.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tweetsweep::{Collector, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> tweetsweep::Result<()> {
//!     let config = RunConfig::new("#covid19 OR #pandemic", bearer_token)
//!         .with_page_size(500)
//!         .with_max_pages(20)
//!         .with_param("start_time", "2020-03-01T00:00:00Z");
//!
//!     let summary = Collector::new(config)?.run().await?;
//!     println!("{} records", summary.stats.records_collected);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Collector (engine)                    │
//! │     fetch page → ingest → follow cursor → pace/sleep     │
//! └──────────────────────────────────────────────────────────┘
//!            │               │                │
//!     ┌──────┴─────┐  ┌──────┴──────┐  ┌─────┴──────┐
//!     │    HTTP    │  │ RetryPolicy │  │ RecordSink │
//!     │ GET, pacer │  │ 429 / 5xx   │  │ CSV + desc │
//!     │ bearer auth│  │ escalation  │  │ raw archive│
//!     └────────────┘  └─────────────┘  └────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]

/// Error types
pub mod error;

/// Run configuration
pub mod config;

/// Payload models and record normalization
pub mod model;

/// HTTP client and request pacing
pub mod http;

/// Retry policy and injectable clock/sleep capabilities
pub mod retry;

/// Record sink and durable output
pub mod sink;

/// The pagination/retry control loop
pub mod engine;

/// Command-line interface
pub mod cli;

pub use config::RunConfig;
pub use engine::{Collector, RunStats, RunSummary};
pub use error::{Error, Result};
pub use model::Record;
pub use sink::RecordSink;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
