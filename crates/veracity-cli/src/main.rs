//! Veracity CLI - offline clustering and risk-pattern tooling.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use veracity_cli::commands;
use veracity_cli::{Cli, Command, Config, Formatter};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> veracity_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let output = match cli.command {
        Command::Cluster(args) => commands::execute_cluster(args, &config, &formatter)?,
        Command::Analyze(args) => commands::execute_analyze(args, &config, &formatter)?,
        Command::Tune(args) => commands::execute_tune(args, &config, &formatter)?,
        Command::Diagnose(args) => commands::execute_diagnose(args, &config, &formatter)?,
    };
    println!("{}", output);

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins
/// unless `-v` was given.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
