//! HTTP layer
//!
//! A thin search client over reqwest plus a token-bucket pacer that
//! enforces the fixed request-rate ceiling between pages. The client
//! makes exactly one attempt per call and classifies the response;
//! retrying is the engine's job, driven by the retry policy.

mod client;
mod pacer;

pub use client::{FetchOutcome, SearchClient};
pub use pacer::{Pacer, PacerConfig};
