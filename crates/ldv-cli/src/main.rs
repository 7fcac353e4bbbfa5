//! # ldv CLI entry point
//!
//! Parses command-line arguments, installs logging, and runs validation.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ldv_cli::validate::{run_validate, ValidateArgs};

/// Validate JSON-LD payloads against the schemas their @context names.
///
/// Accepts plain JSON documents and request collections. Schemas are
/// fetched on first use and shared across every file of the run.
#[derive(Parser, Debug)]
#[command(name = "ldv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    validate: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, takes precedence over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("ldv v{} starting", env!("CARGO_PKG_VERSION"));

    match run_validate(&cli.validate) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
