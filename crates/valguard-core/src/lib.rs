//! # valguard-core: Validated Values
//!
//! Runtime guarantees that a value conforms to its schema, for as long as
//! the value exists.
//!
//! ## Key Design Principles
//!
//! 1. **Construction is validation.** [`ValidatedType::create`] and
//!    [`ValidatedMutableType::create`] are the only ways to obtain a value.
//!    A failed parse yields the schema's `ValidationError` and no value.
//!
//! 2. **Immutable means no mutation API.** [`ValidatedValue`] exposes
//!    shared references and owned copies only, at every depth.
//!
//! 3. **Writes revalidate the whole.** Every [`MutableValue`] write, nested
//!    or top-level, builds a candidate of the *entire* logical value and
//!    parses it with the schema before anything commits. Cross-field
//!    constraints therefore see sibling values.
//!
//! 4. **Transforms re-run on the original input shape.** A mutable value
//!    revalidates against a snapshot of schema *input*, not the parsed
//!    output, so output transforms are never applied twice.
//!
//! 5. **Bare or wrapped, per type.** Record outputs are exposed directly;
//!    anything else, or a record when `wrap_value` is set, is exposed as
//!    `{ "value": output }`. See [`ValuePolicy`].
//!
//! ## Crate Policy
//!
//! - Depends only on `valguard-schema`; schemas are black boxes.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

mod definition;
pub mod immutable;
pub mod interceptor;
pub mod mutable;
pub mod path;
pub mod policy;

pub use immutable::{ValidatedType, ValidatedValue};
pub use interceptor::{MutationInterceptor, RecordMut, Revalidate, SchemaRevalidator};
pub use mutable::{MutableRecord, MutableValue, ValidatedMutableType};
pub use path::FieldPath;
pub use policy::{Representation, ValidatedOptions, ValuePolicy, WRAP_FIELD};

// Schema-side types callers need alongside the validated values.
pub use valguard_schema::{Schema, SchemaExt, SharedSchema, ValidationError};
