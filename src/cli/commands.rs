//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Collect tweets matching a search query into a CSV file
#[derive(Parser, Debug)]
#[command(name = "tweetsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Search query (supports the API's advanced query syntax)
    pub query: String,

    /// Records per page (max_results, API allows up to 500)
    #[arg(long, default_value = "100")]
    pub page_size: u32,

    /// Maximum pages to fetch (0 = keep going until exhaustion)
    #[arg(long, default_value = "0")]
    pub max_pages: u32,

    /// Extra request parameter, passed through verbatim (repeatable)
    ///
    /// Example: --param start_time=2020-03-01T00:00:00Z
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Directory for output files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Append every raw page payload to a .raw.jsonl file
    #[arg(long)]
    pub archive_raw: bool,

    /// Bearer token; falls back to the TWITTER_BEARER_TOKEN env var
    #[arg(long)]
    pub bearer_token: Option<String>,

    /// Search endpoint URL
    #[arg(long, default_value = crate::config::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Verbose (debug-level) logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse a KEY=VALUE pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
