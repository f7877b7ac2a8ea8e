//! Field paths into record-shaped values.
//!
//! A [`FieldPath`] is a sequence of field names. It only descends through
//! records; arrays and scalars end the walk.

use std::fmt;

use serde_json::Value;
use valguard_schema::pointer;

/// An owned path of field names, displayed as a JSON Pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The empty path, addressing the whole value.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a JSON Pointer (`""`, `"/a"`, `"/a/b~1c"`).
    pub fn parse_pointer(ptr: &str) -> Option<Self> {
        pointer::split(ptr).map(Self)
    }

    /// This path extended by one field.
    pub fn child(&self, field: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(field.to_string());
        Self(segments)
    }

    /// True for the empty path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The field names, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Split into the parent path and the last field name.
    pub fn split_last(&self) -> Option<(FieldPath, &str)> {
        let (last, parent) = self.0.split_last()?;
        Some((Self(parent.to_vec()), last.as_str()))
    }

    /// Render as a JSON Pointer.
    pub fn to_pointer(&self) -> String {
        self.0
            .iter()
            .map(|s| format!("/{}", pointer::escape(s)))
            .collect()
    }

    /// Follow the path through nested records.
    pub fn get<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(value, |current, field| current.as_object()?.get(field))
    }

    /// Mutable variant of [`FieldPath::get`].
    pub fn get_mut<'a>(&self, value: &'a mut Value) -> Option<&'a mut Value> {
        self.0
            .iter()
            .try_fold(value, |current, field| current.as_object_mut()?.get_mut(field))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.to_pointer())
        }
    }
}

impl From<&str> for FieldPath {
    /// A single-field path. No pointer parsing is applied.
    fn from(field: &str) -> Self {
        Self(vec![field.to_string()])
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
