//! # Check Subcommand
//!
//! Validate one document against a schema, once.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use valguard_core::{ValidatedOptions, ValidatedType};

use crate::{load_input, load_schema, write_pretty, write_violations};

/// Arguments for the `valguard check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file (JSON Schema, as JSON or YAML).
    #[arg(long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Document to validate.
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 if the document is valid, 1 if not.
pub fn run_check(args: &CheckArgs, options: ValidatedOptions, out: &mut dyn Write) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    let input = load_input(&args.document)?;
    let validated = ValidatedType::with_options(schema, options);

    match validated.create(&input) {
        Ok(value) => {
            tracing::info!(
                document = %args.document.display(),
                representation = %value.representation(),
                "document is valid"
            );
            write_pretty(out, &value.to_visible())?;
            Ok(0)
        }
        Err(e) => {
            tracing::info!(
                document = %args.document.display(),
                violations = e.len(),
                "document is invalid"
            );
            write_violations(out, &e)?;
            Ok(1)
        }
    }
}
