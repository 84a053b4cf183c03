//! Record sink
//!
//! Accumulates normalized records in memory and writes everything out
//! once at the end of the run: a CSV of records, a sibling description
//! file, and (when enabled) a raw-payload archive appended page by
//! page for replay and debugging.

use crate::error::{Error, Result};
use crate::model::{Record, SearchPage, COLUMNS};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Append-only sink for one run's records
pub struct RecordSink {
    records: Vec<Record>,
    csv_path: PathBuf,
    description_path: PathBuf,
    archive_path: Option<PathBuf>,
    archive: Option<BufWriter<File>>,
    finalized: bool,
}

impl RecordSink {
    /// Create a sink writing under `output_dir`, stamped with `started_at`
    pub fn new(output_dir: &Path, archive_raw: bool, started_at: DateTime<Utc>) -> Result<Self> {
        std::fs::create_dir_all(output_dir)?;

        let stamp = started_at.format("%Y-%m-%d_%H-%M-%S");
        let csv_path = output_dir.join(format!("tweets_{stamp}.csv"));
        let description_path = output_dir.join(format!("tweets_{stamp}.description.txt"));

        let (archive_path, archive) = if archive_raw {
            let path = output_dir.join(format!("tweets_{stamp}.raw.jsonl"));
            let file = File::create(&path)?;
            (Some(path), Some(BufWriter::new(file)))
        } else {
            (None, None)
        };

        Ok(Self {
            records: Vec::new(),
            csv_path,
            description_path,
            archive_path,
            archive,
            finalized: false,
        })
    }

    /// Append all records from one page's raw payload
    ///
    /// The raw payload is archived before normalization, so a payload
    /// that fails normalization is still captured for debugging.
    pub fn ingest(&mut self, payload: &Value) -> Result<usize> {
        if self.finalized {
            return Err(Error::sink("ingest after finalize"));
        }

        if let Some(archive) = self.archive.as_mut() {
            serde_json::to_writer(&mut *archive, payload)?;
            archive.write_all(b"\n")?;
        }

        let page = SearchPage::from_value(payload)?;
        let added = page.data.len();
        self.records.extend(page.data.into_iter().map(Record::from));

        debug!(added, total = self.records.len(), "ingested page");
        Ok(added)
    }

    /// Write the CSV and description files; idempotent
    ///
    /// Called on every exit path of a run. The first call writes, any
    /// later call is a no-op, so partial progress is flushed exactly
    /// once no matter how the run ended.
    pub fn finalize(&mut self, description: &str) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;

        if let Some(archive) = self.archive.as_mut() {
            archive.flush()?;
        }
        self.archive = None;

        info!(
            records = self.records.len(),
            file = %self.csv_path.display(),
            "exporting csv"
        );

        // Serialize-driven headers only appear with the first record,
        // so write the header row explicitly; an empty run still
        // produces a CSV with its columns.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.csv_path)?;
        writer.write_record(COLUMNS)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        let full_description = format!(
            "{description}\n\nheaders: {:?}\ndata_shape: ({}, {})\nfor file: {}\n",
            COLUMNS,
            self.records.len(),
            COLUMNS.len(),
            self.csv_path.display()
        );
        std::fs::write(&self.description_path, full_description)?;

        Ok(())
    }

    /// Number of records accumulated so far
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Whether finalize has already run
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Path of the CSV output file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Path of the description file
    pub fn description_path(&self) -> &Path {
        &self.description_path
    }

    /// Path of the raw archive, when archival is enabled
    pub fn archive_path(&self) -> Option<&Path> {
        self.archive_path.as_deref()
    }
}

impl std::fmt::Debug for RecordSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSink")
            .field("records", &self.records.len())
            .field("csv_path", &self.csv_path)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}
