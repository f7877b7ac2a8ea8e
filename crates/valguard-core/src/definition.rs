//! Per-type state shared by both validated-type builders.

use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;
use valguard_schema::{Schema, SharedSchema, ValidationError};

use crate::policy::{Representation, ValidatedOptions, ValuePolicy};

/// A schema plus the representation fixed for every instance of the type.
pub(crate) struct Definition {
    schema: SharedSchema,
    options: ValidatedOptions,
    representation: OnceLock<Representation>,
}

impl Definition {
    /// Fix the representation now if the options or the schema's output
    /// shape allow it; otherwise the first successful parse fixes it.
    pub(crate) fn new(schema: SharedSchema, options: ValidatedOptions) -> Self {
        let representation = OnceLock::new();
        let decided = if options.wrap_value == Some(true) {
            Some(Representation::Wrapped)
        } else {
            schema
                .output_shape()
                .map(|shape| ValuePolicy::for_shape(shape, options.wrap_value))
        };
        if let Some(r) = decided {
            let _ = representation.set(r);
        }

        tracing::debug!(
            schema = %schema.name(),
            representation = ?decided,
            "defined validated type"
        );

        Self {
            schema,
            options,
            representation,
        }
    }

    pub(crate) fn schema(&self) -> &SharedSchema {
        &self.schema
    }

    pub(crate) fn options(&self) -> ValidatedOptions {
        self.options
    }

    pub(crate) fn representation(&self) -> Option<Representation> {
        self.representation.get().copied()
    }

    /// Parse `input` and pair the output with the type's representation.
    ///
    /// A non-record output for a type fixed as bare is rejected: the type
    /// promises direct field access it cannot provide.
    pub(crate) fn parse(&self, input: &Value) -> Result<(Value, Representation), ValidationError> {
        let output = self.schema.parse(input)?;
        let representation = *self
            .representation
            .get_or_init(|| ValuePolicy::decide(&output, self.options.wrap_value));

        if representation == Representation::Bare && !output.is_object() {
            return Err(bare_output_error(self.schema.name()));
        }

        Ok((output, representation))
    }
}

/// Root violation for a non-record output of a type fixed as bare.
pub(crate) fn bare_output_error(schema_name: &str) -> ValidationError {
    ValidationError::single(
        schema_name,
        "",
        "output is not a record but this validated type exposes record fields directly",
    )
}

/// Serialize a typed input into the JSON value the schema parses.
pub(crate) fn to_input<I: Serialize>(schema_name: &str, input: &I) -> Result<Value, ValidationError> {
    serde_json::to_value(input).map_err(|e| {
        ValidationError::single(schema_name, "", format!("input is not representable as JSON: {e}"))
    })
}
