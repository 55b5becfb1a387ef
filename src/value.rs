//! Column value model for the streaming result layer.
//!
//! `Value` is the decoded-but-not-yet-typed representation of one column
//! cell. The reassembly engine only distinguishes *mergeable* variants
//! (strings and lists, which the server may split across two consecutive
//! partial result messages) from atomic ones; mapping a `Value` to a
//! language-native type belongs to the codec layer above this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One decoded column cell.
///
/// `Struct` is carried opaquely: the reassembly layer never splits or
/// inspects struct fields, it only moves them into rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean column value.
    Bool(bool),
    /// Numeric column value.
    Number(f64),
    /// Text column value; may arrive split across two messages.
    String(String),
    /// Ordered list value; may arrive split across two messages.
    List(Vec<Value>),
    /// Opaque struct value, passed through untouched.
    Struct(Vec<Value>),
}

impl Value {
    /// Discriminant of this value, used in diagnostics and merge checks.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Struct(_) => ValueKind::Struct,
        }
    }

    /// Whether this value may legally be split across message boundaries.
    #[must_use]
    pub const fn is_mergeable(&self) -> bool { self.kind().is_mergeable() }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_owned()) }
}

impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Number(value) }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Bool(value) }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self { Value::List(value) }
}

/// Variant discriminant for [`Value`].
///
/// Kept as its own `Copy` enum so errors can name the offending variants
/// without cloning payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// `Value::Null`.
    Null,
    /// `Value::Bool`.
    Bool,
    /// `Value::Number`.
    Number,
    /// `Value::String`.
    String,
    /// `Value::List`.
    List,
    /// `Value::Struct`.
    Struct,
}

impl ValueKind {
    /// Whether values of this kind may be split and later concatenated.
    ///
    /// The match is exhaustive so a new atomic variant cannot silently
    /// bypass the merge check.
    #[must_use]
    pub const fn is_mergeable(self) -> bool {
        match self {
            ValueKind::String | ValueKind::List => true,
            ValueKind::Null | ValueKind::Bool | ValueKind::Number | ValueKind::Struct => false,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Struct => "struct",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
