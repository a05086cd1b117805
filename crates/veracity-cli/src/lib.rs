//! Veracity CLI library.
//!
//! Offline tooling over a JSON array of documents: cluster them, analyze
//! every cluster for risk patterns, search clustering parameters, and
//! profile pairwise similarity.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
