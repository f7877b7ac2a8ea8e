//! # Mutate Subcommand
//!
//! Build a mutable validated value from a document and apply writes to it
//! in order. Each write revalidates the whole document; rejected writes
//! leave the value as it was.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;
use valguard_core::{ValidatedMutableType, ValidatedOptions};

use crate::{load_input, load_schema, write_pretty, write_violations};

/// One `--set POINTER=VALUE` write.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// JSON Pointer over the visible value, e.g. `/age` or `/value/age`.
    pub pointer: String,
    /// New value. Text that is not JSON is taken as a string.
    pub value: Value,
}

/// Parse `POINTER=VALUE`, splitting at the first `=`.
pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (pointer, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected POINTER=VALUE, got {raw:?}"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok(Assignment {
        pointer: pointer.to_string(),
        value,
    })
}

/// Arguments for the `valguard mutate` subcommand.
#[derive(Args, Debug)]
pub struct MutateArgs {
    /// Schema file (JSON Schema, as JSON or YAML).
    #[arg(long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Initial document.
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Write to apply. Repeatable; applied in order.
    #[arg(long = "set", value_name = "POINTER=VALUE", value_parser = parse_assignment)]
    pub sets: Vec<Assignment>,

    /// Stop at the first rejected write and exit with status 1.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the mutate subcommand.
///
/// Returns exit code: 1 if the initial document is invalid, or if a write
/// is rejected under `strict`. Otherwise 0, even when writes were rejected
/// and reported without `strict`.
pub fn run_mutate(
    args: &MutateArgs,
    options: ValidatedOptions,
    strict: bool,
    out: &mut dyn Write,
) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    let input = load_input(&args.document)?;
    let validated = ValidatedMutableType::with_options(schema, options);

    let mut value = match validated.create(&input) {
        Ok(value) => value,
        Err(e) => {
            writeln!(out, "document is invalid")?;
            write_violations(out, &e)?;
            return Ok(1);
        }
    };

    let mut rejected = 0usize;
    for assignment in &args.sets {
        match value.set_pointer(&assignment.pointer, assignment.value.clone()) {
            Ok(()) => writeln!(out, "OK {}", assignment.pointer)?,
            Err(e) => {
                rejected += 1;
                writeln!(out, "REJECTED {}", assignment.pointer)?;
                write_violations(out, &e)?;
                if strict {
                    tracing::info!(pointer = %assignment.pointer, "stopping at rejected write");
                    return Ok(1);
                }
            }
        }
    }

    tracing::info!(
        writes = args.sets.len(),
        rejected,
        "applied writes"
    );
    write_pretty(out, &value.to_visible())?;
    Ok(0)
}
