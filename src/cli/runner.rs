//! CLI runner - wires arguments into a collector run

use crate::cli::commands::Cli;
use crate::config::RunConfig;
use crate::engine::Collector;
use crate::error::{Error, Result};

/// Environment variable consulted when --bearer-token is not given
pub const TOKEN_ENV_VAR: &str = "TWITTER_BEARER_TOKEN";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Execute the run described by the CLI arguments
    pub async fn run(self) -> Result<()> {
        let bearer_token = self.resolve_token()?;

        let mut config = RunConfig::new(&self.cli.query, bearer_token)
            .with_endpoint(&self.cli.endpoint)
            .with_page_size(self.cli.page_size)
            .with_max_pages(self.cli.max_pages)
            .with_archive_raw(self.cli.archive_raw)
            .with_output_dir(&self.cli.output_dir);
        for (key, value) in &self.cli.params {
            config = config.with_param(key, value);
        }

        let summary = Collector::new(config)?.run().await?;

        println!(
            "collected {} records across {} pages in {:.1}s",
            summary.stats.records_collected,
            summary.stats.pages_fetched,
            summary.stats.duration_ms as f64 / 1000.0
        );
        println!("results: {}", summary.csv_path.display());
        println!("description: {}", summary.description_path.display());
        if let Some(archive) = &summary.archive_path {
            println!("raw archive: {}", archive.display());
        }

        Ok(())
    }

    /// Bearer token from the flag, falling back to the environment
    fn resolve_token(&self) -> Result<String> {
        if let Some(token) = &self.cli.bearer_token {
            return Ok(token.clone());
        }
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(Error::MissingBearerToken),
        }
    }
}
