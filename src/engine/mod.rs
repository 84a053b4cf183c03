//! Collection engine
//!
//! The pagination/retry control loop. Drives page fetches against the
//! search endpoint, hands payloads to the sink, follows the cursor
//! token, and applies the retry policy on failures. Strictly one
//! request in flight; the only suspension points are the pacer wait,
//! the policy sleeps, and the network call itself.

mod prompt;
mod types;

pub use prompt::{ContinuePrompt, StdinPrompt};
pub use types::{RunStats, RunSummary};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::http::{FetchOutcome, Pacer, SearchClient};
use crate::model::extract_next_token;
use crate::retry::{
    Clock, Decision, FailureKind, ResetHeader, RetryPolicy, Sleeper, SystemClock, TokioSleeper,
};
use crate::sink::RecordSink;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Sequential collector for one search query
pub struct Collector {
    config: RunConfig,
    client: SearchClient,
    policy: RetryPolicy,
    pacer: Option<Pacer>,
    sleeper: Box<dyn Sleeper>,
    clock: Box<dyn Clock>,
    prompt: Box<dyn ContinuePrompt>,
    stats: RunStats,
}

impl Collector {
    /// Create a collector with production capabilities
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let client = SearchClient::new(&config)?;

        Ok(Self {
            config,
            client,
            policy: RetryPolicy::default(),
            pacer: Some(Pacer::default()),
            sleeper: Box::new(TokioSleeper),
            clock: Box::new(SystemClock),
            prompt: Box::new(StdinPrompt),
            stats: RunStats::new(),
        })
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override or disable the pacer
    #[must_use]
    pub fn with_pacer(mut self, pacer: Option<Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Inject a sleeper (tests run without real waiting)
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Inject a clock
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Inject an operator prompt
    #[must_use]
    pub fn with_prompt(mut self, prompt: Box<dyn ContinuePrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Run the collection loop to completion
    ///
    /// The sink finalizes exactly once on every exit path: page limit,
    /// cursor exhaustion, operator abort, or any propagated error.
    pub async fn run(mut self) -> Result<RunSummary> {
        let start = Instant::now();
        let mut sink = RecordSink::new(
            &self.config.output_dir,
            self.config.archive_raw,
            self.clock.now(),
        )?;

        info!(
            query = %self.config.query,
            max_pages = self.config.max_pages,
            "starting run"
        );

        let outcome = self.drive_pages(&mut sink).await;

        let description = format!(
            "query: {}\nparams: {}",
            self.config.query,
            self.config.params_summary()
        );
        if let Err(e) = sink.finalize(&description) {
            error!("failed to flush output: {e}");
            outcome?;
            return Err(e);
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);

        if let Err(e) = outcome {
            error!(
                records = sink.record_count(),
                "run ended with an error; collected records were flushed"
            );
            return Err(e);
        }

        info!(
            pages = self.stats.pages_fetched,
            records = self.stats.records_collected,
            file = %sink.csv_path().display(),
            "run complete"
        );

        Ok(RunSummary {
            stats: self.stats,
            csv_path: sink.csv_path().to_path_buf(),
            description_path: sink.description_path().to_path_buf(),
            archive_path: sink.archive_path().map(std::path::Path::to_path_buf),
        })
    }

    /// Fetch pages until the limit, exhaustion, or an abort
    async fn drive_pages(&mut self, sink: &mut RecordSink) -> Result<()> {
        let max_pages = self.config.max_pages;
        let mut page: u32 = 1;
        let mut cursor: Option<String> = None;
        let mut failures: u32 = 0;

        // max_pages == 0 means no page limit
        while max_pages == 0 || page <= max_pages {
            if let Some(pacer) = &self.pacer {
                pacer.wait().await;
            }

            let fetched = self.client.fetch_page(cursor.as_deref()).await;
            let outcome = match fetched {
                Ok(outcome) => outcome,
                Err(e @ Error::Http(_)) => {
                    warn!("network error: {e}");
                    self.handle_failure(&FailureKind::Transport, &mut failures)
                        .await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match outcome {
                FetchOutcome::Page { payload } => {
                    failures = 0;
                    let added = sink.ingest(&payload)?;
                    self.stats.add_page(added);
                    info!(page, added, total = sink.record_count(), "page ingested");

                    match extract_next_token(&payload) {
                        Some(token) => {
                            cursor = Some(token);
                            page += 1;
                        }
                        None => {
                            debug!(page, "no next_token in response; search exhausted");
                            return Ok(());
                        }
                    }
                }
                FetchOutcome::RateLimited { headers } => {
                    self.stats.add_rate_limit_hit();
                    self.handle_failure(&FailureKind::RateLimited { headers: &headers }, &mut failures)
                        .await?;
                }
                FetchOutcome::Failed { status, body } => {
                    warn!(status, body = %truncate(&body), "page fetch failed");
                    self.handle_failure(&FailureKind::Status { status }, &mut failures)
                        .await?;
                }
            }
        }

        info!(max_pages, "page limit reached");
        Ok(())
    }

    /// Apply the policy decision for one failed fetch
    ///
    /// The cursor is untouched on every path, so the retry always
    /// re-requests the same page.
    async fn handle_failure(&mut self, kind: &FailureKind<'_>, failures: &mut u32) -> Result<()> {
        let decision = self.policy.decide(kind, *failures, self.clock.now());
        match decision {
            Decision::WaitForReset { wait } => {
                warn!(
                    wait_secs = wait.as_secs(),
                    "rate limited; sleeping until server reset plus margin"
                );
                self.sleeper.sleep(wait).await;
            }
            Decision::Cooldown { wait, condition } => {
                *failures += 1;
                self.stats.add_retry();
                match condition {
                    ResetHeader::Missing => warn!(
                        wait_secs = wait.as_secs(),
                        "rate limited with no reset header; applying fallback cooldown"
                    ),
                    ResetHeader::Unparsable(raw) => warn!(
                        raw = %raw,
                        wait_secs = wait.as_secs(),
                        "rate limited with unparsable reset header; applying fallback cooldown"
                    ),
                    ResetHeader::Present(_) => {}
                }
                self.sleeper.sleep(wait).await;
            }
            Decision::Backoff { wait } => {
                *failures += 1;
                self.stats.add_retry();
                warn!(
                    failures = *failures,
                    wait_secs = wait.as_secs(),
                    "transient failure; backing off before retrying the same page"
                );
                self.sleeper.sleep(wait).await;
            }
            Decision::Escalate { failures: count } => {
                *failures = count;
                warn!(
                    failures = count,
                    "consecutive failure limit reached; asking the operator"
                );
                if self.prompt.confirm_continue(count)? {
                    info!("operator chose to continue; failure counter reset");
                    *failures = 0;
                } else {
                    return Err(Error::Aborted { failures: count });
                }
            }
        }
        Ok(())
    }
}

/// Cap error bodies logged at warn level
fn truncate(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}
