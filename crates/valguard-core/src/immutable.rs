//! # Immutable Validated Values
//!
//! [`ValidatedType`] runs the schema once per construction and hands out a
//! [`ValidatedValue`]. A `ValidatedValue` has no mutation API at all, at any
//! depth: every accessor returns a shared reference or an owned copy.
//!
//! ```compile_fail
//! use serde_json::json;
//! use valguard_core::ValidatedType;
//! use valguard_schema::JsonSchema;
//!
//! let t = ValidatedType::new(JsonSchema::from_value(json!({"type": "object"})).unwrap());
//! let mut v = t.create(&json!({"age": 30})).unwrap();
//! v.set("age", json!(31)).unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;
use valguard_schema::{Schema, SharedSchema, ValidationError};

use crate::definition::{to_input, Definition};
use crate::policy::{Representation, ValidatedOptions};

/// Constructor for immutable validated values of one schema.
///
/// Cheap to clone; clones share the schema and the fixed representation.
///
/// ## Representation
///
/// Bare or wrapped is decided once per type (see [`crate::ValuePolicy`]).
/// A schema whose output is sometimes a record and sometimes not is the
/// caller's responsibility: once a type is bare, a non-record output is
/// rejected.
#[derive(Clone)]
pub struct ValidatedType {
    definition: Arc<Definition>,
}

impl ValidatedType {
    /// Define a validated type with default options.
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self::with_options(schema, ValidatedOptions::default())
    }

    /// Define a validated type.
    pub fn with_options(schema: impl Schema + 'static, options: ValidatedOptions) -> Self {
        Self::from_shared(Arc::new(schema), options)
    }

    /// Define a validated type over an already shared schema.
    pub fn from_shared(schema: SharedSchema, options: ValidatedOptions) -> Self {
        Self {
            definition: Arc::new(Definition::new(schema, options)),
        }
    }

    /// Validate `input` and build a value.
    ///
    /// # Errors
    ///
    /// The schema's `ValidationError`, unmodified.
    pub fn create(&self, input: &Value) -> Result<ValidatedValue, ValidationError> {
        let (value, representation) = self.definition.parse(input)?;
        tracing::trace!(
            schema = %self.definition.schema().name(),
            %representation,
            "constructed validated value"
        );
        Ok(ValidatedValue {
            value,
            representation,
        })
    }

    /// Serialize a typed input and validate it.
    ///
    /// # Errors
    ///
    /// The schema's `ValidationError`, or a root violation if `input`
    /// cannot be serialized to JSON.
    pub fn create_from<I: Serialize>(&self, input: &I) -> Result<ValidatedValue, ValidationError> {
        let input = to_input(self.definition.schema().name(), input)?;
        self.create(&input)
    }

    /// The underlying schema, for use as a field inside another schema.
    pub fn schema(&self) -> &SharedSchema {
        self.definition.schema()
    }

    /// The fixed representation, if already decided.
    pub fn representation(&self) -> Option<Representation> {
        self.definition.representation()
    }

    /// Options this type was defined with.
    pub fn options(&self) -> ValidatedOptions {
        self.definition.options()
    }
}

impl fmt::Debug for ValidatedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedType")
            .field("schema", &self.definition.schema().name())
            .field("representation", &self.representation())
            .finish()
    }
}

/// A value that passed its schema and can no longer change.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedValue {
    value: Value,
    representation: Representation,
}

impl ValidatedValue {
    pub(crate) fn from_parts(value: Value, representation: Representation) -> Self {
        Self {
            value,
            representation,
        }
    }

    /// Bare or wrapped.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// The validated output, without any wrapper.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Read a visible top-level field. A wrapped value has only `value`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.representation.get(&self.value, field)
    }

    /// Resolve a JSON Pointer over the visible value.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.representation.pointer(&self.value, pointer)
    }

    /// The externally visible value: the record, or `{ "value": .. }`.
    pub fn to_visible(&self) -> Value {
        self.representation.expose(&self.value)
    }

    /// Deserialize the validated output into a typed view.
    ///
    /// # Errors
    ///
    /// `serde_json::Error` if the output does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.value.clone())
    }

    /// Consume the value, returning the validated output.
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl Serialize for ValidatedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_visible(&self.value, self.representation, serializer)
    }
}

impl fmt::Display for ValidatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_visible())
    }
}

pub(crate) fn serialize_visible<S: Serializer>(
    value: &Value,
    representation: Representation,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    match representation {
        Representation::Bare => value.serialize(serializer),
        Representation::Wrapped => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(crate::policy::WRAP_FIELD, value)?;
            map.end()
        }
    }
}
