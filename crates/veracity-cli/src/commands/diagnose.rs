//! Diagnose command implementation.

use super::load_documents;
use crate::cli::DiagnoseArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use veracity_cluster::SimilarityProfile;

/// Execute the diagnose command.
pub fn execute_diagnose(args: DiagnoseArgs, _config: &Config, formatter: &Formatter) -> Result<String> {
    let documents = load_documents(&args.input)?;
    let profile = SimilarityProfile::from_documents(&documents, args.sample)?;
    formatter.format_profile(&profile)
}
