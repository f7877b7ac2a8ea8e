//! # Value Policy
//!
//! Decides how a validated output is exposed:
//!
//! - **Bare**: the record itself; its fields are read directly.
//! - **Wrapped**: a single-field record `{ "value": output }`.
//!
//! A non-record output is always wrapped, since it has no field names to
//! expose. A record is bare unless the caller asks for wrapping.
//!
//! The decision belongs to the validated *type*, not to each instance.
//! Schemas whose output flips between record and non-record across valid
//! inputs are outside the contract; see [`crate::ValidatedType`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use valguard_schema::Shape;

use crate::path::FieldPath;

/// Field name of the wrapper record in the wrapped representation.
pub const WRAP_FIELD: &str = "value";

/// How a validated value is exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Fields of the output record are exposed directly.
    Bare,
    /// The output is exposed as the `value` field of a wrapper record.
    Wrapped,
}

impl Representation {
    /// Read a top-level visible field.
    pub fn get<'a>(&self, logical: &'a Value, field: &str) -> Option<&'a Value> {
        match self {
            Representation::Bare => logical.get(field),
            Representation::Wrapped => (field == WRAP_FIELD).then_some(logical),
        }
    }

    /// Resolve a JSON Pointer over the visible value.
    pub fn pointer<'a>(&self, logical: &'a Value, pointer: &str) -> Option<&'a Value> {
        let path = FieldPath::parse_pointer(pointer)?;
        let logical_path = self.to_logical(&path)?;
        logical_path.get(logical)
    }

    /// Map a visible path to the path inside the logical value.
    ///
    /// Returns `None` for a wrapped path that does not start with `value`,
    /// including the wrapper root itself.
    pub fn to_logical(&self, visible: &FieldPath) -> Option<FieldPath> {
        match self {
            Representation::Bare => Some(visible.clone()),
            Representation::Wrapped => match visible.segments().split_first() {
                Some((head, rest)) if head == WRAP_FIELD => Some(rest.iter().cloned().collect()),
                _ => None,
            },
        }
    }

    /// Build the externally visible value.
    pub fn expose(&self, logical: &Value) -> Value {
        match self {
            Representation::Bare => logical.clone(),
            Representation::Wrapped => {
                let mut wrapper = serde_json::Map::new();
                wrapper.insert(WRAP_FIELD.to_string(), logical.clone());
                Value::Object(wrapper)
            }
        }
    }
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Representation::Bare => f.write_str("bare"),
            Representation::Wrapped => f.write_str("wrapped"),
        }
    }
}

/// Options accepted by both validated-type builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatedOptions {
    /// Force a record output into the `{ "value": .. }` wrapper.
    /// Unset means "bare when the output is a record".
    pub wrap_value: Option<bool>,
}

impl ValidatedOptions {
    /// Options requesting the wrapped representation.
    pub fn wrapped() -> Self {
        Self {
            wrap_value: Some(true),
        }
    }
}

/// The bare-or-wrapped decision.
#[derive(Debug, Clone, Copy)]
pub struct ValuePolicy;

impl ValuePolicy {
    /// Decide from a concrete validated output.
    pub fn decide(output: &Value, wrap_value: Option<bool>) -> Representation {
        Self::for_shape(Shape::of(output), wrap_value)
    }

    /// Decide from an output shape known ahead of any input.
    pub fn for_shape(shape: Shape, wrap_value: Option<bool>) -> Representation {
        match shape {
            Shape::Scalar => Representation::Wrapped,
            Shape::Record if wrap_value.unwrap_or(false) => Representation::Wrapped,
            Shape::Record => Representation::Bare,
        }
    }
}
