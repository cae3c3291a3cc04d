//! Tooling Layer
//!
//! Command-line surface over the catalog library: argument parsing, command
//! dispatch and output formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
