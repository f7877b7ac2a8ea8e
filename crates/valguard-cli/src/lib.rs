//! # valguard-cli: CLI Tool for Validated Values
//!
//! Provides the `valguard` command-line interface over `valguard-core`.
//!
//! ## Subcommands
//!
//! - `valguard check`: validate a document once and print the visible value.
//! - `valguard mutate`: build a mutable value and apply pointer writes to it,
//!   each revalidated against the whole document.
//!
//! ```bash
//! valguard check --schema person.schema.json person.json
//! valguard mutate --schema person.schema.yaml person.yaml --set /age=31 --set /name=Jane
//! ```
//!
//! Schemas and documents are JSON, or YAML when the extension is `.yaml`
//! or `.yml`.

pub mod check;
pub mod config;
pub mod mutate;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use valguard_core::ValidationError;
use valguard_schema::JsonSchema;

/// Load and compile a schema file.
pub fn load_schema(path: &Path) -> Result<JsonSchema> {
    let schema = JsonSchema::from_file(path)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    tracing::info!(schema = %path.display(), "loaded schema");
    Ok(schema)
}

/// Load a JSON or YAML document.
pub fn load_input(path: &Path) -> Result<Value> {
    let document = valguard_schema::load_document(path)
        .with_context(|| format!("failed to load document {}", path.display()))?;
    Ok(document)
}

/// Print every violation of `err`, one per line.
pub fn write_violations(out: &mut dyn Write, err: &ValidationError) -> Result<()> {
    writeln!(out, "{err}")?;
    Ok(())
}

/// Print a value as pretty JSON.
pub fn write_pretty(out: &mut dyn Write, value: &Value) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
