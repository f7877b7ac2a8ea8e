//! # Record Composition
//!
//! [`RecordSchema`] assembles a record schema out of per-field schemas.
//! Each field is parsed by its own schema, so field-level transforms and
//! nested validated types compose naturally:
//!
//! ```
//! use serde_json::json;
//! use valguard_schema::{JsonSchema, RecordSchema, Schema, SchemaExt};
//!
//! let tag = JsonSchema::from_value(json!({"type": "string", "pattern": "^foo:"}))
//!     .unwrap()
//!     .transform(|v| json!(v.as_str().unwrap_or_default().trim_start_matches("foo:")));
//! let schema = RecordSchema::new("tagged").field("foo", tag);
//!
//! assert_eq!(schema.parse(&json!({"foo": "foo:abc"})).unwrap(), json!({"foo": "abc"}));
//! ```
//!
//! Undeclared fields are violations, as are missing required fields.
//! Violations from every field are collected before the record is rejected.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::engine::{Schema, Shape, SharedSchema};
use crate::error::{ValidationError, Violation};
use crate::pointer;

struct FieldSpec {
    name: String,
    schema: SharedSchema,
    required: bool,
}

/// A record whose fields are each validated by their own schema.
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// An empty record schema; add fields with [`RecordSchema::field`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a required field.
    pub fn field(self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.push(name.into(), Arc::new(schema), true)
    }

    /// Add a field that may be absent from the input.
    pub fn optional(self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.push(name.into(), Arc::new(schema), false)
    }

    fn push(mut self, name: String, schema: SharedSchema, required: bool) -> Self {
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldSpec {
            name,
            schema,
            required,
        });
        self
    }

    /// Declared field names, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    fn violation(&self, field: &str, message: String) -> Violation {
        Violation {
            instance_path: format!("/{}", pointer::escape(field)),
            schema_path: String::new(),
            message,
        }
    }
}

impl Schema for RecordSchema {
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let Some(object) = input.as_object() else {
            return Err(ValidationError::single(
                self.name.clone(),
                "",
                format!("expected a record, got {}", type_name(input)),
            ));
        };

        let mut output = Map::new();
        let mut violations = Vec::new();

        for spec in &self.fields {
            match object.get(&spec.name) {
                Some(value) => match spec.schema.parse(value) {
                    Ok(parsed) => {
                        output.insert(spec.name.clone(), parsed);
                    }
                    Err(e) => violations.extend(e.nest(&spec.name).violations.into_inner()),
                },
                None if spec.required => violations.push(
                    self.violation(&spec.name, format!("\"{}\" is a required property", spec.name)),
                ),
                None => {}
            }
        }

        for key in object.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                violations.push(self.violation(key, format!("\"{key}\" is not a declared property")));
            }
        }

        if violations.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(ValidationError::new(self.name.clone(), violations))
        }
    }

    fn output_shape(&self) -> Option<Shape> {
        Some(Shape::Record)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
