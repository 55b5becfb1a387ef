//! Partial result messages as delivered by the transport.

use serde::{Deserialize, Serialize};

use crate::{schema::RowSchema, value::Value};

/// One unit of a streaming query response.
///
/// Carries the next run of flattened column values in row-major order. The
/// first message of a stream also carries the schema; when `chunked` is set,
/// the last value of `values` is incomplete and continues in the next
/// message.
///
/// # Examples
///
/// ```
/// use rowframe::{
///     message::PartialMessage,
///     schema::{Column, ColumnType, RowSchema},
///     value::Value,
/// };
///
/// let schema = RowSchema::new(vec![Column::new("word", ColumnType::String)]);
/// let first = PartialMessage::new(vec![Value::from("he")], true).with_schema(schema);
/// assert!(first.chunked);
/// assert!(first.schema.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartialMessage {
    /// Result-set schema; present only on the first message of a stream.
    pub schema: Option<RowSchema>,
    /// Flattened column values, row-major, last one possibly incomplete.
    pub values: Vec<Value>,
    /// Whether the last value of `values` continues in the next message.
    pub chunked: bool,
}

impl PartialMessage {
    /// Build a schema-less message from values and the chunked flag.
    #[must_use]
    pub fn new(values: Vec<Value>, chunked: bool) -> Self {
        Self {
            schema: None,
            values,
            chunked,
        }
    }

    /// Build an empty keepalive message carrying no values.
    #[must_use]
    pub fn keepalive() -> Self { Self::new(Vec::new(), false) }

    /// Attach the stream schema, as the first message of a stream does.
    #[must_use]
    pub fn with_schema(mut self, schema: RowSchema) -> Self {
        self.schema = Some(schema);
        self
    }
}
