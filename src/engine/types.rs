//! Engine types
//!
//! Run statistics and the summary returned by a completed run.

use std::path::PathBuf;

/// Statistics from one collection run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Pages successfully fetched and ingested
    pub pages_fetched: u32,
    /// Records accumulated across all pages
    pub records_collected: usize,
    /// 429 responses seen
    pub rate_limit_hits: u32,
    /// Counted retries (fallback cooldowns and transient backoffs)
    pub transient_retries: u32,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful page with its record count
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_collected += records;
    }

    /// Record a 429 response
    pub fn add_rate_limit_hit(&mut self) {
        self.rate_limit_hits += 1;
    }

    /// Record a counted retry
    pub fn add_retry(&mut self) {
        self.transient_retries += 1;
    }

    /// Set the run duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Run statistics
    pub stats: RunStats,
    /// Path of the CSV output
    pub csv_path: PathBuf,
    /// Path of the description file
    pub description_path: PathBuf,
    /// Path of the raw archive, when enabled
    pub archive_path: Option<PathBuf>,
}
