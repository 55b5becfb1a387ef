//! Completed result rows.

use crate::{schema::RowSchema, value::Value};

/// One complete row: exactly `schema.width()` values in column order.
///
/// Rows share the stream's [`RowSchema`] handle, so cloning a row never
/// copies the column descriptors.
///
/// # Examples
///
/// ```
/// use rowframe::{
///     row::Row,
///     schema::{Column, ColumnType, RowSchema},
///     value::Value,
/// };
///
/// let schema = RowSchema::new(vec![
///     Column::new("id", ColumnType::Number),
///     Column::new("name", ColumnType::String),
/// ]);
/// let row = Row::new(schema, vec![Value::Number(7.0), Value::from("ada")]);
/// assert_eq!(row.width(), 2);
/// assert_eq!(row.get_named("name"), Some(&Value::from("ada")));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    schema: RowSchema,
    values: Vec<Value>,
}

impl Row {
    /// Assemble a row from a schema handle and its column values.
    ///
    /// Callers are expected to supply exactly `schema.width()` values; the
    /// reassembler upholds this for every row it emits.
    #[must_use]
    pub fn new(schema: RowSchema, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.width(), values.len());
        Self { schema, values }
    }

    /// Schema shared by every row of the stream.
    #[must_use]
    pub fn schema(&self) -> &RowSchema { &self.schema }

    /// Number of columns in this row.
    #[must_use]
    pub fn width(&self) -> usize { self.values.len() }

    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] { &self.values }

    /// Value at the given column index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> { self.values.get(index) }

    /// Value of the first column with the given name.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.schema.column_index(name).and_then(|i| self.get(i))
    }

    /// Consume the row, returning the owned values for the codec layer.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> { self.values }
}
