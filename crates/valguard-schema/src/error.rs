//! # Error Types
//!
//! Two error families leave this crate:
//!
//! - [`ValidationError`]: a value was rejected by a schema. Carries the
//!   schema name and every violation with its JSON Pointer location. This is
//!   the only failure the validated-value layer ever surfaces, unmodified.
//! - [`SchemaError`]: a schema engine could not be built (bad document,
//!   unreadable file).

use std::fmt;

use thiserror::Error;

use crate::pointer;

/// A value did not conform to a schema.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed against schema '{schema_name}':\n{violations}")]
pub struct ValidationError {
    /// Name of the schema that rejected the value.
    pub schema_name: String,
    /// Structured list of individual violations.
    pub violations: ValidationViolations,
}

impl ValidationError {
    /// Build an error from an already collected set of violations.
    pub fn new(schema_name: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema_name: schema_name.into(),
            violations: ValidationViolations { violations },
        }
    }

    /// Build an error holding exactly one violation.
    pub fn single(
        schema_name: impl Into<String>,
        instance_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            schema_name,
            vec![Violation {
                instance_path: instance_path.into(),
                schema_path: String::new(),
                message: message.into(),
            }],
        )
    }

    /// A write addressed a field the record does not have.
    pub fn unknown_field(schema_name: impl Into<String>, instance_path: impl Into<String>) -> Self {
        let instance_path = instance_path.into();
        let message = format!("property {} does not exist", display_path(&instance_path));
        Self::single(schema_name, instance_path, message)
    }

    /// A field access tried to descend into a value that is not a record.
    pub fn not_a_record(schema_name: impl Into<String>, instance_path: impl Into<String>) -> Self {
        let instance_path = instance_path.into();
        let message = format!("{} is not a record", display_path(&instance_path));
        Self::single(schema_name, instance_path, message)
    }

    /// Re-root every violation under `field`.
    ///
    /// Used when a field schema fails inside an enclosing record: a
    /// violation at `/baz` of field `bar` becomes `/bar/baz`.
    pub fn nest(mut self, field: &str) -> Self {
        let prefix = format!("/{}", pointer::escape(field));
        for v in &mut self.violations.violations {
            v.instance_path = format!("{prefix}{}", v.instance_path);
        }
        self
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        self.violations.violations()
    }
}

fn display_path(instance_path: &str) -> &str {
    if instance_path.is_empty() {
        "(root)"
    } else {
        instance_path
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    /// Empty when the violation did not come from a schema document.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", display_path(&self.instance_path), self.message)
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Error while building a schema engine.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be loaded.
    #[error("schema load error for '{schema_name}': {reason}")]
    Load {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    Build {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// A JSON document could not be parsed.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// Path of the document.
        path: String,
        /// Parser error.
        source: serde_json::Error,
    },

    /// A YAML document could not be parsed into a JSON value.
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        /// Path of the document.
        path: String,
        /// Parser error.
        source: serde_yaml::Error,
    },

    /// IO error reading a schema or document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_format() {
        let v = Violation {
            instance_path: "/bar/baz".to_string(),
            schema_path: "/properties/bar/properties/baz/minimum".to_string(),
            message: "-1 is less than the minimum of 0".to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/bar/baz"));
        assert!(display.contains("less than the minimum"));
    }

    #[test]
    fn violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""age" is a required property"#.to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn error_display_lists_every_violation() {
        let err = ValidationError::new(
            "person",
            vec![
                Violation {
                    instance_path: "/name".to_string(),
                    schema_path: String::new(),
                    message: "too short".to_string(),
                },
                Violation {
                    instance_path: "/age".to_string(),
                    schema_path: String::new(),
                    message: "negative".to_string(),
                },
            ],
        );
        let display = err.to_string();
        assert!(display.starts_with("validation failed against schema 'person'"));
        assert!(display.contains("/name: too short"));
        assert!(display.contains("/age: negative"));
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn nest_prefixes_instance_paths() {
        let err = ValidationError::single("inner", "/baz", "bad").nest("bar");
        assert_eq!(err.violations()[0].instance_path, "/bar/baz");

        let root = ValidationError::single("inner", "", "bad").nest("a/b");
        assert_eq!(root.violations()[0].instance_path, "/a~1b");
    }

    #[test]
    fn unknown_field_names_the_path() {
        let err = ValidationError::unknown_field("person", "/nickname");
        assert_eq!(err.violations()[0].instance_path, "/nickname");
        assert!(err.violations()[0].message.contains("does not exist"));
    }

    #[test]
    fn not_a_record_at_root() {
        let err = ValidationError::not_a_record("age", "");
        assert!(err.violations()[0].message.contains("(root) is not a record"));
    }
}
