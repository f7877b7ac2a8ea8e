//! # Mutation Interceptor
//!
//! The primitive underneath every mutable validated value. An interceptor
//! owns three things:
//!
//! - the **live** value, which callers read;
//! - the **snapshot**, the schema-input-shaped picture of the whole logical
//!   value, used as the basis for the next revalidation;
//! - a **revalidate** hook that parses a whole candidate snapshot.
//!
//! Every write, at any depth, goes through the same sequence:
//!
//! 1. Build a candidate: a copy of the snapshot with the field replaced.
//! 2. Revalidate the whole candidate.
//! 3. On failure, return the error. Live value and snapshot are untouched.
//! 4. On success, set the live field to the *revalidated* value at that
//!    path (transforms apply), and adopt the candidate as the snapshot.
//!
//! Nested records are reached through [`RecordMut`] handles. A handle is a
//! path into the interceptor, not a copy: it shares the single snapshot, so
//! replacing a whole nested field can never leave a later nested write
//! validating against a stale basis.
//!
//! ## Invariants
//!
//! - Passing the snapshot to the hook succeeds at every point between
//!   writes.
//! - A failed write changes nothing.

use std::fmt;

use serde_json::Value;
use valguard_schema::{Schema, SharedSchema, ValidationError};

use crate::definition::bare_output_error;
use crate::path::FieldPath;

/// Revalidation hook: parse a whole candidate snapshot.
pub trait Revalidate {
    /// Validate the candidate and return the validated whole value.
    fn revalidate(&self, candidate: &Value) -> Result<Value, ValidationError>;

    /// Name used in errors the interceptor raises itself.
    fn name(&self) -> &str {
        "revalidate"
    }
}

impl<F> Revalidate for F
where
    F: Fn(&Value) -> Result<Value, ValidationError>,
{
    fn revalidate(&self, candidate: &Value) -> Result<Value, ValidationError> {
        self(candidate)
    }
}

/// Revalidates by parsing the candidate with a shared schema.
#[derive(Clone)]
pub struct SchemaRevalidator {
    schema: SharedSchema,
    records_only: bool,
}

impl SchemaRevalidator {
    /// Revalidate through `schema`.
    pub fn new(schema: SharedSchema) -> Self {
        Self {
            schema,
            records_only: false,
        }
    }

    /// Revalidate through `schema`, and also reject any output that is not
    /// a record. Used by bare values, whose fields are exposed directly.
    pub fn records_only(schema: SharedSchema) -> Self {
        Self {
            schema,
            records_only: true,
        }
    }
}

impl Revalidate for SchemaRevalidator {
    fn revalidate(&self, candidate: &Value) -> Result<Value, ValidationError> {
        let output = self.schema.parse(candidate)?;
        if self.records_only && !output.is_object() {
            return Err(bare_output_error(self.schema.name()));
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        self.schema.name()
    }
}

impl fmt::Debug for SchemaRevalidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRevalidator")
            .field("schema", &self.schema.name())
            .field("records_only", &self.records_only)
            .finish()
    }
}

/// A live value whose writes are revalidated as a whole before commit.
#[derive(Clone)]
pub struct MutationInterceptor<R> {
    live: Value,
    snapshot: Value,
    revalidate: R,
}

impl<R: Revalidate> MutationInterceptor<R> {
    /// Intercept writes to `live`.
    ///
    /// `snapshot` must be the input `live` was validated from; the caller
    /// guarantees `revalidate(snapshot)` currently succeeds.
    pub fn new(live: Value, snapshot: Value, revalidate: R) -> Self {
        Self {
            live,
            snapshot,
            revalidate,
        }
    }

    /// The current live value.
    pub fn live(&self) -> &Value {
        &self.live
    }

    /// The current revalidation basis.
    pub fn snapshot(&self) -> &Value {
        &self.snapshot
    }

    /// The revalidation hook.
    pub fn revalidator(&self) -> &R {
        &self.revalidate
    }

    /// Consume the interceptor, returning `(live, snapshot)`.
    pub fn into_parts(self) -> (Value, Value) {
        (self.live, self.snapshot)
    }

    /// Read a live value by path.
    pub fn read(&self, path: &FieldPath) -> Option<&Value> {
        path.get(&self.live)
    }

    /// Write `value` at `path`, committing only if the whole candidate
    /// revalidates. Writing the root path replaces the whole value.
    ///
    /// # Errors
    ///
    /// - the hook's `ValidationError` if the candidate is rejected;
    /// - `unknown_field` if the live record has no such field;
    /// - `not_a_record` if the parent of `path` is not a record in the live
    ///   value or in the snapshot.
    pub fn write(&mut self, path: &FieldPath, value: Value) -> Result<(), ValidationError> {
        let Some((parent, field)) = path.split_last() else {
            return self.replace(value);
        };

        match parent.get(&self.live).and_then(Value::as_object) {
            Some(record) if record.contains_key(field) => {}
            Some(_) => {
                return Err(ValidationError::unknown_field(
                    self.revalidate.name(),
                    path.to_pointer(),
                ))
            }
            None => {
                return Err(ValidationError::not_a_record(
                    self.revalidate.name(),
                    parent.to_pointer(),
                ))
            }
        }

        let mut candidate = self.snapshot.clone();
        let Some(slot) = parent.get_mut(&mut candidate).and_then(Value::as_object_mut) else {
            return Err(ValidationError::not_a_record(
                self.revalidate.name(),
                parent.to_pointer(),
            ));
        };
        slot.insert(field.to_string(), value);

        let validated = self.revalidate.revalidate(&candidate).map_err(|e| {
            tracing::debug!(
                schema = %self.revalidate.name(),
                path = %path,
                violations = e.len(),
                "rejected write"
            );
            e
        })?;

        match path.get(&validated).cloned() {
            Some(committed) if path.get(&self.live).is_some() => {
                if let Some(target) = path.get_mut(&mut self.live) {
                    *target = committed;
                }
            }
            _ => self.live = validated,
        }
        self.snapshot = candidate;

        tracing::trace!(schema = %self.revalidate.name(), path = %path, "committed write");
        Ok(())
    }

    /// Replace the whole value: revalidate `input` as a brand-new input and,
    /// on success, adopt it as the fresh snapshot.
    ///
    /// # Errors
    ///
    /// The hook's `ValidationError`; nothing changes in that case.
    pub fn replace(&mut self, input: Value) -> Result<(), ValidationError> {
        let validated = self.revalidate.revalidate(&input).map_err(|e| {
            tracing::debug!(
                schema = %self.revalidate.name(),
                violations = e.len(),
                "rejected replacement"
            );
            e
        })?;
        self.live = validated;
        self.snapshot = input;
        tracing::trace!(schema = %self.revalidate.name(), "committed replacement");
        Ok(())
    }

    /// A nested interceptor handle for the record at `path`.
    ///
    /// # Errors
    ///
    /// `unknown_field` if nothing lives at `path`, `not_a_record` if the
    /// value there is not a record.
    pub fn record(&mut self, path: FieldPath) -> Result<RecordMut<'_, R>, ValidationError> {
        let is_record = path.get(&self.live).map(Value::is_object);
        match is_record {
            Some(true) => Ok(RecordMut {
                interceptor: self,
                base: path,
            }),
            Some(false) => Err(ValidationError::not_a_record(
                self.revalidate.name(),
                path.to_pointer(),
            )),
            None => Err(ValidationError::unknown_field(
                self.revalidate.name(),
                path.to_pointer(),
            )),
        }
    }
}

impl<R> fmt::Debug for MutationInterceptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationInterceptor")
            .field("live", &self.live)
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

/// Write access to one record nested inside an intercepted value.
///
/// Writes through the handle revalidate the entire outer value.
pub struct RecordMut<'a, R> {
    interceptor: &'a mut MutationInterceptor<R>,
    base: FieldPath,
}

impl<R: Revalidate> RecordMut<'_, R> {
    /// Path of this record inside the logical value.
    pub fn path(&self) -> &FieldPath {
        &self.base
    }

    /// The record's current live value.
    pub fn value(&self) -> Option<&Value> {
        self.interceptor.read(&self.base)
    }

    /// Read one field of the record.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.interceptor.read(&self.base.child(field))
    }

    /// Write one field of the record; see [`MutationInterceptor::write`].
    ///
    /// # Errors
    ///
    /// As for [`MutationInterceptor::write`].
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), ValidationError> {
        self.interceptor.write(&self.base.child(field), value)
    }

    /// Handle for a record nested one level further down.
    ///
    /// # Errors
    ///
    /// As for [`MutationInterceptor::record`].
    pub fn record(&mut self, field: &str) -> Result<RecordMut<'_, R>, ValidationError> {
        let path = self.base.child(field);
        self.interceptor.record(path)
    }
}

impl<R> fmt::Debug for RecordMut<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordMut")
            .field("path", &self.base)
            .finish_non_exhaustive()
    }
}
