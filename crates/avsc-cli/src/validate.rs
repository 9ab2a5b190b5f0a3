//! # Validate Subcommand
//!
//! Validates one or more `.avsc` files. Each file is reported on its own
//! line; the exit code is 1 if any file fails.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use avsc_schema::{SchemaValidator, ValidationConfig};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema files to validate.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print the Parsing Canonical Form of each valid schema.
    #[arg(long)]
    pub canonical: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &ValidationConfig) -> Result<u8> {
    let validator = SchemaValidator::new(*config);
    let mut failures = 0usize;

    for path in &args.paths {
        match validator.validate_file(path) {
            Ok(schema) => {
                println!("  OK    {}", path.display());
                if args.canonical {
                    println!("        {}", schema.canonical_form());
                }
            }
            Err(e) => {
                failures += 1;
                println!("  FAIL  {}", path.display());
                for line in e.to_string().lines() {
                    println!("        {line}");
                }
            }
        }
    }

    tracing::info!(total = args.paths.len(), failures, "validation finished");
    Ok(u8::from(failures > 0))
}
