//! Result-set schema for one query stream.
//!
//! A [`RowSchema`] arrives exactly once, on the first partial result message
//! of a query, and fixes the row width for the lifetime of the stream. It is
//! shared by `Arc` between the reassembler and every emitted row.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Declared type of one result column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Boolean column.
    Bool,
    /// Numeric column.
    Number,
    /// Text column.
    String,
    /// Ordered list column with a uniform element type.
    List(Box<ColumnType>),
    /// Struct column; field layout is opaque to this layer.
    Struct,
}

/// One column of the result set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as returned by the server.
    pub name: String,
    /// Declared column type.
    pub ty: ColumnType,
}

impl Column {
    /// Construct a column descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Immutable, ordered description of the columns in a result stream.
///
/// # Examples
///
/// ```
/// use rowframe::schema::{Column, ColumnType, RowSchema};
///
/// let schema = RowSchema::new(vec![
///     Column::new("id", ColumnType::Number),
///     Column::new("name", ColumnType::String),
/// ]);
/// assert_eq!(schema.width(), 2);
/// assert_eq!(schema.column_index("name"), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSchema {
    columns: Arc<[Column]>,
}

impl RowSchema {
    /// Build a schema from an ordered column list.
    #[must_use]
    pub fn new(columns: impl Into<Vec<Column>>) -> Self {
        Self {
            columns: columns.into().into(),
        }
    }

    /// Number of columns per row; fixed for the life of the stream.
    #[must_use]
    pub fn width(&self) -> usize { self.columns.len() }

    /// Ordered column descriptors.
    #[must_use]
    pub fn columns(&self) -> &[Column] { &self.columns }

    /// Position of the first column with the given name, if any.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
