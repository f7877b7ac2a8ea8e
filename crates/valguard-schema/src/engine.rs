//! # The Schema Capability
//!
//! A [`Schema`] turns an input value into a validated output value or
//! rejects it with a [`ValidationError`]. Nothing else about the engine is
//! visible to the validated-value layer: rules, coercions, transforms and
//! error wording all live behind `parse`.
//!
//! The combinators here ([`Transformed`], [`Refined`], [`FnSchema`]) are
//! engine-side conveniences. They wrap any schema and stay schemas.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ValidationError;

/// Whether a schema's output is a record (JSON object) or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A JSON object with named fields.
    Record,
    /// Any non-record value: null, bool, number, string or array.
    Scalar,
}

impl Shape {
    /// Classify a concrete value.
    pub fn of(value: &Value) -> Self {
        if value.is_object() {
            Shape::Record
        } else {
            Shape::Scalar
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Record => f.write_str("record"),
            Shape::Scalar => f.write_str("scalar"),
        }
    }
}

/// A validating, possibly transforming, parser over JSON values.
///
/// Implementations must be deterministic: parsing the same input twice
/// yields the same result. Schemas are created once per validated type and
/// shared by every instance, hence `Send + Sync`.
pub trait Schema: Send + Sync {
    /// Validate `input` and produce the output value.
    fn parse(&self, input: &Value) -> Result<Value, ValidationError>;

    /// Type-level hint of the output shape, when the engine knows it
    /// without seeing an input.
    fn output_shape(&self) -> Option<Shape> {
        None
    }

    /// Name used in error reports.
    fn name(&self) -> &str {
        "schema"
    }
}

/// A schema shared between validated types and composite schemas.
pub type SharedSchema = Arc<dyn Schema>;

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        (**self).parse(input)
    }

    fn output_shape(&self) -> Option<Shape> {
        (**self).output_shape()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        (**self).parse(input)
    }

    fn output_shape(&self) -> Option<Shape> {
        (**self).output_shape()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A schema defined by a closure.
pub struct FnSchema<F> {
    name: String,
    shape: Option<Shape>,
    parse: F,
}

impl<F> FnSchema<F>
where
    F: Fn(&Value) -> Result<Value, ValidationError> + Send + Sync,
{
    /// Wrap `parse` under the given name. The output shape is unknown
    /// unless declared with [`FnSchema::with_shape`].
    pub fn new(name: impl Into<String>, parse: F) -> Self {
        Self {
            name: name.into(),
            shape: None,
            parse,
        }
    }

    /// Declare the output shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }
}

impl<F> Schema for FnSchema<F>
where
    F: Fn(&Value) -> Result<Value, ValidationError> + Send + Sync,
{
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        (self.parse)(input)
    }

    fn output_shape(&self) -> Option<Shape> {
        self.shape
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSchema")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Runs the inner schema, then maps its output.
///
/// The output shape is unknown: a transform may turn a string into a
/// record or the other way round.
pub struct Transformed<S, F> {
    inner: S,
    transform: F,
}

impl<S, F> Schema for Transformed<S, F>
where
    S: Schema,
    F: Fn(Value) -> Value + Send + Sync,
{
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        self.inner.parse(input).map(&self.transform)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Runs the inner schema, then checks a predicate over the whole output.
pub struct Refined<S, F> {
    inner: S,
    predicate: F,
    message: String,
}

impl<S, F> Schema for Refined<S, F>
where
    S: Schema,
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let output = self.inner.parse(input)?;
        if (self.predicate)(&output) {
            Ok(output)
        } else {
            Err(ValidationError::single(
                self.inner.name(),
                "",
                self.message.clone(),
            ))
        }
    }

    fn output_shape(&self) -> Option<Shape> {
        self.inner.output_shape()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Combinators available on every schema.
pub trait SchemaExt: Schema + Sized {
    /// Map the output of this schema.
    fn transform<F>(self, transform: F) -> Transformed<Self, F>
    where
        F: Fn(Value) -> Value + Send + Sync,
    {
        Transformed {
            inner: self,
            transform,
        }
    }

    /// Reject outputs for which `predicate` is false.
    fn refine<F>(self, predicate: F, message: impl Into<String>) -> Refined<Self, F>
    where
        F: Fn(&Value) -> bool + Send + Sync,
    {
        Refined {
            inner: self,
            predicate,
            message: message.into(),
        }
    }

    /// Move this schema behind an `Arc` so it can be shared.
    fn shared(self) -> SharedSchema
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<S: Schema> SchemaExt for S {}
