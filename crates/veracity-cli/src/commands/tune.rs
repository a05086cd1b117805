//! Tune command implementation.

use super::load_documents;
use crate::cli::TuneArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use veracity_cluster::ParameterSearch;

/// Execute the tune command.
pub fn execute_tune(args: TuneArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    if args.top == 0 {
        return Err(CliError::InvalidInput("--top must be at least 1".to_string()));
    }

    let documents = load_documents(&args.input)?;
    let results = ParameterSearch::with_base(config.cluster.clone()).run(&documents)?;
    let recommended = ParameterSearch::recommend(&results);

    formatter.format_tuning(&results, args.top, recommended)
}
