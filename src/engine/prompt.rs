//! Operator escalation prompt
//!
//! After repeated consecutive failures the loop pauses and asks the
//! operator whether to keep retrying. The trait seam lets tests answer
//! without a terminal.

use crate::error::Result;
use std::io::{BufRead, Write};

/// Decides whether to keep retrying after the failure threshold
pub trait ContinuePrompt: Send + Sync {
    /// Return true to keep retrying the same page, false to abort
    fn confirm_continue(&self, failures: u32) -> Result<bool>;
}

/// Interactive prompt on stderr/stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl ContinuePrompt for StdinPrompt {
    fn confirm_continue(&self, failures: u32) -> Result<bool> {
        let mut stderr = std::io::stderr().lock();
        write!(
            stderr,
            "{failures} consecutive failures talking to the API. Keep retrying? [y/N] "
        )?;
        stderr.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
