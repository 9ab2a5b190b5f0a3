//! # avsc-cli: Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate`: check schema files and print their canonical form
//! - `encode`: JSON value file to an Avro binary datum
//! - `decode`: Avro binary datum to JSON, with optional reader schema
//! - `sample`: example payload for a record schema
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return an exit code.
//! - Handlers delegate to `avsc-schema` and `avsc-codec`.

pub mod decode;
pub mod encode;
pub mod sample;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use avsc_schema::{SchemaValidator, ValidatedSchema, ValidationConfig};

/// Read and validate a schema file under `config`.
pub fn load_schema(path: &Path, config: &ValidationConfig) -> Result<ValidatedSchema> {
    SchemaValidator::new(*config)
        .validate_file(path)
        .with_context(|| format!("invalid schema: {}", path.display()))
}

/// Read a JSON document from a file.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}
