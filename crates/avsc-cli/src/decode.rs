//! # Decode Subcommand
//!
//! Decodes one Avro binary datum and prints it as pretty JSON. With
//! `--reader-schema` the datum is projected onto that schema.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use avsc_codec::DatumReader;
use avsc_schema::ValidationConfig;

use crate::load_schema;

/// Arguments for the decode subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Schema the datum was written with.
    #[arg(long)]
    pub schema: PathBuf,

    /// Schema to read the datum as. Defaults to the writer schema.
    #[arg(long)]
    pub reader_schema: Option<PathBuf>,

    /// File holding the raw datum bytes.
    #[arg(long)]
    pub input: PathBuf,
}

/// Execute the decode subcommand.
pub fn run_decode(args: &DecodeArgs, config: &ValidationConfig) -> Result<u8> {
    let writer = load_schema(&args.schema, config)?;
    let reader = match &args.reader_schema {
        Some(path) => load_schema(path, config)?,
        None => writer.clone(),
    };

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let value = DatumReader::new(reader, writer)?
        .decode(&bytes)
        .with_context(|| format!("cannot decode {}", args.input.display()))?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(0)
}
