//! # Encode Subcommand
//!
//! Encodes a JSON value file as one Avro binary datum. The datum is written
//! to `--output` if given, otherwise printed to stdout as hex.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use avsc_codec::DatumWriter;
use avsc_schema::ValidationConfig;

use crate::{load_schema, read_json};

/// Arguments for the encode subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Writer schema file.
    #[arg(long)]
    pub schema: PathBuf,

    /// JSON value file.
    #[arg(long)]
    pub value: PathBuf,

    /// Destination for the raw datum bytes.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs, config: &ValidationConfig) -> Result<u8> {
    let schema = load_schema(&args.schema, config)?;
    let value = read_json(&args.value)?;

    let bytes = DatumWriter::new(schema)?
        .encode(&value)
        .with_context(|| format!("cannot encode {}", args.value.display()))?;
    tracing::debug!(len = bytes.len(), "encoded value");

    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("  wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => println!("{}", to_hex(&bytes)),
    }
    Ok(0)
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
