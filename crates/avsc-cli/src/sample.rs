//! # Sample Subcommand
//!
//! Prints an example payload for a record schema. `--set name=value`
//! overrides a field; the value is parsed as JSON and falls back to a plain
//! string.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::{Map, Value};

use avsc_codec::{generate_payload_data, DatumWriter};
use avsc_schema::ValidationConfig;

use crate::encode::to_hex;
use crate::load_schema;

/// Arguments for the sample subcommand.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Record schema file.
    #[arg(long)]
    pub schema: PathBuf,

    /// Field override as `name=value`. Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    /// Also print the encoded datum as hex.
    #[arg(long)]
    pub encode: bool,
}

/// Execute the sample subcommand.
pub fn run_sample(args: &SampleArgs, config: &ValidationConfig) -> Result<u8> {
    let schema = load_schema(&args.schema, config)?;
    let overrides = parse_overrides(&args.overrides)?;

    let payload = Value::Object(generate_payload_data(&schema, &overrides)?);
    println!("{}", serde_json::to_string_pretty(&payload)?);

    if args.encode {
        let bytes = DatumWriter::new(schema)?.encode(&payload)?;
        println!("{}", to_hex(&bytes));
    }
    Ok(0)
}

fn parse_overrides(raw: &[String]) -> Result<Map<String, Value>> {
    let mut overrides = Map::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once('=') else {
            bail!("override '{entry}' is not of the form name=value");
        };
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        overrides.insert(name.to_string(), value);
    }
    Ok(overrides)
}
