//! # valguard-schema: Schema Engine Adapter
//!
//! Defines the capability the validated-value layer consumes: a
//! [`Schema`] that parses an input value into a validated output or fails
//! with a structured [`ValidationError`]. The layer above treats every
//! schema as a black box; this crate is where concrete engines live.
//!
//! ## Engines
//!
//! - [`JsonSchema`]: Draft 2020-12 JSON Schema compiled by the
//!   `jsonschema` crate. Validates without transforming.
//! - [`RecordSchema`]: a record assembled from per-field schemas.
//! - [`FnSchema`]: any closure.
//!
//! ## Combinators
//!
//! [`SchemaExt`] adds `.transform(..)` (map the output), `.refine(..)`
//! (predicate over the whole output, for cross-field rules) and
//! `.shared()` (into a [`SharedSchema`]).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `valguard-*` crates.
//! - Schemas are `Send + Sync` and deterministic.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod engine;
pub mod error;
pub mod json;
pub mod pointer;
pub mod record;

pub use engine::{FnSchema, Refined, Schema, SchemaExt, Shape, SharedSchema, Transformed};
pub use error::{SchemaError, ValidationError, ValidationViolations, Violation};
pub use json::{load_document, JsonSchema};
pub use record::RecordSchema;
