//! CLI module
//!
//! Command-line interface over [`crate::api::StashApi`].
//!
//! # Commands
//!
//! One subcommand per resource (`projects`, `repos`, `pull-requests`,
//! `build-status`, ...). Each prints one JSON line per fetch event, or only
//! the aggregated items with `--aggregate`.

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

#[cfg(test)]
mod tests;
