//! # JSON Schema Engine
//!
//! A [`Schema`] backed by a compiled JSON Schema (Draft 2020-12) from the
//! `jsonschema` crate. JSON Schema validates but never transforms, so a
//! successful `parse` returns the input unchanged.
//!
//! Schema documents may be loaded from JSON or YAML files; YAML is read
//! directly into a JSON value tree before compilation.

use std::fmt;
use std::path::Path;

use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::engine::{Schema, Shape};
use crate::error::{SchemaError, ValidationError, Violation};

/// A compiled JSON Schema.
///
/// `JsonSchema` is `Send + Sync`; compile once and share the result
/// between every instance of a validated type.
pub struct JsonSchema {
    name: String,
    document: Value,
    validator: Validator,
}

impl JsonSchema {
    /// Compile a schema document.
    ///
    /// The schema name is taken from `$id` or `title` when present.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Build` if the document is not a valid schema.
    pub fn from_value(document: Value) -> Result<Self, SchemaError> {
        let name = document
            .get("$id")
            .or_else(|| document.get("title"))
            .and_then(|v| v.as_str())
            .unwrap_or("anonymous")
            .to_string();
        Self::named(name, document)
    }

    /// Compile a schema document under an explicit name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Build` if the document is not a valid schema.
    pub fn named(name: impl Into<String>, document: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft202012);

        let validator = opts.build(&document).map_err(|e| SchemaError::Build {
            schema_name: name.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(schema = %name, "compiled JSON schema");

        Ok(Self {
            name,
            document,
            validator,
        })
    }

    /// Parse and compile a JSON schema document from a string.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` for malformed JSON and
    /// `SchemaError::Build` for an invalid schema.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self, SchemaError> {
        let document: Value = serde_json::from_str(source).map_err(|e| SchemaError::Load {
            schema_name: "anonymous".to_string(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::from_value(document)
    }

    /// Load and compile a schema file (`.json`, `.yaml` or `.yml`).
    ///
    /// The file name becomes the schema name unless the document has `$id`
    /// or `title`.
    ///
    /// # Errors
    ///
    /// Returns the [`load_document`] error if the file cannot be read or
    /// parsed and `SchemaError::Build` if it is not a valid schema.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("schema")
            .to_string();

        let document = load_document(path)?;

        if document.get("$id").is_some() || document.get("title").is_some() {
            Self::from_value(document)
        } else {
            Self::named(file_name, document)
        }
    }

    /// The source schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl Schema for JsonSchema {
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(input)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(input.clone())
        } else {
            Err(ValidationError::new(self.name.clone(), violations))
        }
    }

    /// Read from the top-level `"type"` keyword. A `type` array or a
    /// missing keyword gives no hint.
    fn output_shape(&self) -> Option<Shape> {
        match self.document.get("type")?.as_str()? {
            "object" => Some(Shape::Record),
            _ => Some(Shape::Scalar),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("name", &self.name)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

/// Load a JSON or YAML document from disk.
///
/// The format is chosen by extension: `.yaml`/`.yml` are YAML, anything
/// else is JSON. YAML is deserialized straight into a JSON value tree.
///
/// # Errors
///
/// `SchemaError::Io` if the file cannot be read, `SchemaError::Json` or
/// `SchemaError::Yaml` if it cannot be parsed.
pub fn load_document(path: &Path) -> Result<Value, SchemaError> {
    let content = std::fs::read_to_string(path)?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|source| SchemaError::Yaml {
            path: path.display().to_string(),
            source,
        }),
        _ => serde_json::from_str(&content).map_err(|source| SchemaError::Json {
            path: path.display().to_string(),
            source,
        }),
    }
}
