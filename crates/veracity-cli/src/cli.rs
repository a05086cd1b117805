//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Veracity CLI - Offline clustering and risk-pattern tooling.
#[derive(Debug, Parser)]
#[command(name = "veracity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VERACITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cluster documents and print assignments with statistics
    Cluster(ClusterArgs),

    /// Cluster documents and analyze every cluster for risk patterns
    Analyze(AnalyzeArgs),

    /// Search eps and min_samples for a good clustering
    Tune(TuneArgs),

    /// Profile pairwise similarity and suggest an eps range
    Diagnose(DiagnoseArgs),
}

/// Density overrides shared by commands that cluster.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DensityArgs {
    /// Neighbourhood radius (cosine distance), overrides the config
    #[arg(long)]
    pub eps: Option<f64>,

    /// Core point threshold, overrides the config
    #[arg(long)]
    pub min_samples: Option<usize>,
}

/// Arguments for the cluster command.
#[derive(Debug, Parser)]
pub struct ClusterArgs {
    /// JSON file holding an array of documents
    pub input: PathBuf,

    #[command(flatten)]
    pub density: DensityArgs,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// JSON file holding an array of documents
    pub input: PathBuf,

    #[command(flatten)]
    pub density: DensityArgs,

    /// Only show clusters scoring at least this (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for the tune command.
#[derive(Debug, Parser)]
pub struct TuneArgs {
    /// JSON file holding an array of documents
    pub input: PathBuf,

    /// Number of ranked results to show
    #[arg(short, long, default_value = "10")]
    pub top: usize,
}

/// Arguments for the diagnose command.
#[derive(Debug, Parser)]
pub struct DiagnoseArgs {
    /// JSON file holding an array of documents
    pub input: PathBuf,

    /// Most and least similar pairs to show
    #[arg(short, long, default_value = "5")]
    pub sample: usize,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
