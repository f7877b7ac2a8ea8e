//! # Mutable Validated Values
//!
//! [`ValidatedMutableType`] builds [`MutableValue`]s: values that stay valid
//! for their whole lifetime. Every field write, at any depth, re-parses the
//! entire logical value through the schema and commits only on success.
//!
//! ## Snapshot
//!
//! Each instance keeps the schema *input* it corresponds to, seeded from
//! the original construction input rather than the parsed output. Schemas
//! may transform (`"foo:abc"` → `"abc"`), and merging a new field into the
//! output would feed already-transformed values back into the schema.
//!
//! ## Addressing
//!
//! | Representation | Top-level fields | Nested records |
//! |---|---|---|
//! | bare | the output record's fields | `record_mut("bar")` |
//! | wrapped | only `value`; writing it replaces the whole value | `record_mut("value")` |
//!
//! ## Concurrency
//!
//! Writes take `&mut self`, so the read-candidate / revalidate / commit
//! sequence is never interleaved with another write to the same instance.
//! Share an instance across threads behind a `Mutex`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;
use valguard_schema::{Schema, SharedSchema, ValidationError};

use crate::definition::{to_input, Definition};
use crate::immutable::{serialize_visible, ValidatedValue};
use crate::interceptor::{MutationInterceptor, RecordMut, Revalidate, SchemaRevalidator};
use crate::path::FieldPath;
use crate::policy::{Representation, ValidatedOptions, WRAP_FIELD};

/// Constructor for mutable validated values of one schema.
///
/// Cheap to clone; clones share the schema and the fixed representation.
/// Instances never share state with each other.
#[derive(Clone)]
pub struct ValidatedMutableType {
    definition: Arc<Definition>,
}

impl ValidatedMutableType {
    /// Define a mutable validated type with default options.
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self::with_options(schema, ValidatedOptions::default())
    }

    /// Define a mutable validated type.
    pub fn with_options(schema: impl Schema + 'static, options: ValidatedOptions) -> Self {
        Self::from_shared(Arc::new(schema), options)
    }

    /// Define a mutable validated type over an already shared schema.
    pub fn from_shared(schema: SharedSchema, options: ValidatedOptions) -> Self {
        Self {
            definition: Arc::new(Definition::new(schema, options)),
        }
    }

    /// Validate `input` and build a value. No instance exists on failure.
    ///
    /// # Errors
    ///
    /// The schema's `ValidationError`, unmodified.
    pub fn create(&self, input: &Value) -> Result<MutableValue, ValidationError> {
        let (output, representation) = self.definition.parse(input)?;
        let schema = Arc::clone(self.definition.schema());
        let revalidator = match representation {
            Representation::Bare => SchemaRevalidator::records_only(schema),
            Representation::Wrapped => SchemaRevalidator::new(schema),
        };

        tracing::trace!(
            schema = %self.definition.schema().name(),
            %representation,
            "constructed mutable validated value"
        );

        Ok(MutableValue {
            representation,
            interceptor: MutationInterceptor::new(output, input.clone(), revalidator),
        })
    }

    /// Serialize a typed input and validate it.
    ///
    /// # Errors
    ///
    /// The schema's `ValidationError`, or a root violation if `input`
    /// cannot be serialized to JSON.
    pub fn create_from<I: Serialize>(&self, input: &I) -> Result<MutableValue, ValidationError> {
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

impl fmt::Debug for ValidatedMutableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedMutableType")
            .field("schema", &self.definition.schema().name())
            .field("representation", &self.representation())
            .finish()
    }
}

/// A value whose every write is validated against the whole.
#[derive(Clone)]
pub struct MutableValue {
    representation: Representation,
    interceptor: MutationInterceptor<SchemaRevalidator>,
}

/// Nested record handle of a [`MutableValue`].
pub type MutableRecord<'a> = RecordMut<'a, SchemaRevalidator>;

impl MutableValue {
    /// Bare or wrapped.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// The current validated output, without any wrapper.
    pub fn value(&self) -> &Value {
        self.interceptor.live()
    }

    /// The schema input the current value corresponds to.
    pub fn snapshot(&self) -> &Value {
        self.interceptor.snapshot()
    }

    /// Read a visible top-level field. A wrapped value has only `value`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.representation.get(self.interceptor.live(), field)
    }

    /// Resolve a JSON Pointer over the visible value.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.representation.pointer(self.interceptor.live(), pointer)
    }

    /// The externally visible value: the record, or `{ "value": .. }`.
    pub fn to_visible(&self) -> Value {
        self.representation.expose(self.interceptor.live())
    }

    /// Deserialize the current output into a typed view.
    ///
    /// # Errors
    ///
    /// `serde_json::Error` if the output does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.interceptor.live().clone())
    }

    /// Write a top-level visible field.
    ///
    /// For a bare value, `field` is one of the record's fields. For a
    /// wrapped value the only field is `value`, and writing it re-parses
    /// `new_value` as a brand-new input.
    ///
    /// # Errors
    ///
    /// The schema's `ValidationError` if the resulting whole value is
    /// invalid, or `unknown_field` for a field the value does not have. The
    /// value is unchanged on error.
    pub fn set(&mut self, field: &str, new_value: Value) -> Result<(), ValidationError> {
        match self.representation {
            Representation::Bare => self.interceptor.write(&FieldPath::from(field), new_value),
            Representation::Wrapped if field == WRAP_FIELD => self.interceptor.replace(new_value),
            Representation::Wrapped => Err(self.unknown(&FieldPath::from(field))),
        }
    }

    /// Handle for a record-shaped top-level field. Writes through the
    /// handle (and through handles it hands out) revalidate the whole value.
    ///
    /// # Errors
    ///
    /// `unknown_field` for a missing field, `not_a_record` if the field
    /// holds a non-record value.
    pub fn record_mut(&mut self, field: &str) -> Result<MutableRecord<'_>, ValidationError> {
        match self.representation {
            Representation::Bare => self.interceptor.record(FieldPath::from(field)),
            Representation::Wrapped if field == WRAP_FIELD => {
                self.interceptor.record(FieldPath::root())
            }
            Representation::Wrapped => Err(self.unknown(&FieldPath::from(field))),
        }
    }

    /// Write the field addressed by a JSON Pointer over the visible value,
    /// e.g. `/bar/baz` (bare) or `/value/bar/baz` (wrapped).
    ///
    /// # Errors
    ///
    /// As for [`MutableValue::set`]; also a root violation for a malformed
    /// pointer or for the root of a bare value, which is not a field.
    pub fn set_pointer(&mut self, pointer: &str, new_value: Value) -> Result<(), ValidationError> {
        let name = self.schema_name().to_string();
        let visible = FieldPath::parse_pointer(pointer).ok_or_else(|| {
            ValidationError::single(name.clone(), "", format!("invalid JSON pointer {pointer:?}"))
        })?;
        if visible.is_root() {
            return Err(ValidationError::single(
                name,
                "",
                "the root of a validated value is not a field",
            ));
        }
        let logical = self
            .representation
            .to_logical(&visible)
            .ok_or_else(|| self.unknown(&visible))?;
        self.interceptor.write(&logical, new_value)
    }

    /// Stop accepting writes: convert into an immutable value.
    pub fn freeze(self) -> ValidatedValue {
        let (live, _) = self.interceptor.into_parts();
        ValidatedValue::from_parts(live, self.representation)
    }

    fn schema_name(&self) -> &str {
        self.interceptor.revalidator().name()
    }

    fn unknown(&self, visible: &FieldPath) -> ValidationError {
        ValidationError::unknown_field(self.schema_name(), visible.to_pointer())
    }
}

impl Serialize for MutableValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_visible(self.interceptor.live(), self.representation, serializer)
    }
}

impl fmt::Display for MutableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_visible())
    }
}

impl fmt::Debug for MutableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableValue")
            .field("representation", &self.representation)
            .field("value", self.interceptor.live())
            .field("snapshot", self.interceptor.snapshot())
            .finish()
    }
}
