//! # avsc CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, loads the
//! validation config and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use avsc_cli::decode::{run_decode, DecodeArgs};
use avsc_cli::encode::{run_encode, EncodeArgs};
use avsc_cli::sample::{run_sample, SampleArgs};
use avsc_cli::validate::{run_validate, ValidateArgs};
use avsc_schema::ValidationConfig;

/// Avro schema toolkit.
///
/// Validates schema files, encodes and decodes single binary datums, and
/// generates example payloads for record schemas.
#[derive(Parser, Debug)]
#[command(name = "avsc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a validation config file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate schema files.
    Validate(ValidateArgs),

    /// Encode a JSON value as an Avro binary datum.
    Encode(EncodeArgs),

    /// Decode an Avro binary datum to JSON.
    Decode(DecodeArgs),

    /// Print an example payload for a record schema.
    Sample(SampleArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => match ValidationConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::from(2);
            }
        },
        None => ValidationConfig::default(),
    };
    tracing::debug!(?config, "loaded validation config");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, &config),
        Commands::Encode(args) => run_encode(args, &config),
        Commands::Decode(args) => run_decode(args, &config),
        Commands::Sample(args) => run_sample(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
