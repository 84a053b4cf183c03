//! CLI module
//!
//! Argument parsing and the runner that turns arguments into a
//! configured collection run.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::{Runner, TOKEN_ENV_VAR};
