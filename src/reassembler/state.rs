//! Stateful reassembly of partial result messages into complete rows.
//!
//! `Reassembler` is a pure, synchronous state machine: one call to
//! [`Reassembler::process`] per inbound message, strictly in arrival order,
//! never concurrently. Exclusive ownership of the state is what makes the
//! single-flight discipline a type-level fact; the pump in
//! [`crate::pump`] upholds the ordering.

use std::mem;

use tracing::{debug, trace};

use super::{error::ReassemblyError, merge::merge_chunked};
use crate::{message::PartialMessage, row::Row, schema::RowSchema, value::Value};

/// Reassembles an ordered sequence of partial result messages into
/// fixed-width rows.
///
/// Created once per query execution and discarded when the stream completes,
/// errors, or is cancelled. Never shared across queries.
///
/// # Examples
///
/// ```
/// use rowframe::{
///     message::PartialMessage,
///     reassembler::Reassembler,
///     schema::{Column, ColumnType, RowSchema},
///     value::Value,
/// };
///
/// let schema = RowSchema::new(vec![Column::new("word", ColumnType::String)]);
/// let mut reassembler = Reassembler::new();
///
/// // "hello" split across two messages at "he" / "llo".
/// let first = PartialMessage::new(vec![Value::from("he")], true).with_schema(schema);
/// assert!(reassembler.process(first).expect("valid message").is_empty());
///
/// let second = PartialMessage::new(vec![Value::from("llo")], false);
/// let rows = reassembler.process(second).expect("valid message");
/// assert_eq!(rows[0].values(), &[Value::from("hello")]);
/// assert!(reassembler.is_drained());
/// ```
#[derive(Debug, Default)]
pub struct Reassembler {
    /// Installed on the first message; never cleared afterwards.
    schema: Option<RowSchema>,
    /// Cells accumulated for the row currently being built.
    pending_row: Vec<Value>,
    /// Trailing incomplete value held over from the previous message.
    carry: Option<Value>,
}

impl Reassembler {
    /// Create a reassembler awaiting the first message of a stream.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Schema seen on the first message, once installed.
    #[must_use]
    pub fn schema(&self) -> Option<&RowSchema> { self.schema.as_ref() }

    /// Whether the previous message left an incomplete trailing value.
    #[must_use]
    pub fn has_carry(&self) -> bool { self.carry.is_some() }

    /// Number of cells accumulated towards the row currently being built.
    #[must_use]
    pub fn pending_len(&self) -> usize { self.pending_row.len() }

    /// Whether no partial row and no carried value remain.
    ///
    /// On a well-formed stream this holds after the final message; the
    /// caller layer decides what a violation means (see
    /// [`ensure_drained`](Self::ensure_drained)).
    #[must_use]
    pub fn is_drained(&self) -> bool { self.pending_row.is_empty() && self.carry.is_none() }

    /// Check that the stream ended on a row boundary with no live carry.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::TruncatedStream`] when a partly built row
    /// or an unfinished carried value remains.
    pub fn ensure_drained(&self) -> Result<(), ReassemblyError> {
        if self.is_drained() {
            Ok(())
        } else {
            Err(ReassemblyError::TruncatedStream)
        }
    }

    /// Consume one partial result message and return the rows it completed,
    /// in completion order.
    ///
    /// Messages with an empty value list are keepalives and leave the state
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`ReassemblyError`] when the message violates the stream
    /// protocol; the state is then in the partial condition reached at the
    /// point of failure and the stream must be aborted.
    pub fn process(&mut self, message: PartialMessage) -> Result<Vec<Row>, ReassemblyError> {
        if let Some(schema) = message.schema {
            self.install_schema(schema)?;
        }

        if message.values.is_empty() {
            if message.chunked {
                return Err(ReassemblyError::EmptyChunkedMessage);
            }
            trace!("keepalive message with no values");
            return Ok(Vec::new());
        }

        let schema = self.schema.clone().ok_or(ReassemblyError::MissingSchema)?;
        let width = schema.width();

        let mut values = message.values;
        if let Some(carried) = self.carry.take() {
            let continuation = values.remove(0);
            values.insert(0, merge_chunked(carried, continuation)?);
        }

        // Only the last value of a message may be left incomplete.
        if message.chunked {
            self.carry = values.pop();
        }

        let mut rows = Vec::new();
        for value in values {
            self.pending_row.push(value);
            if self.pending_row.len() == width {
                rows.push(Row::new(schema.clone(), mem::take(&mut self.pending_row)));
            }
        }

        trace!(
            rows = rows.len(),
            pending = self.pending_row.len(),
            carry = self.carry.is_some(),
            "message processed"
        );
        Ok(rows)
    }

    fn install_schema(&mut self, schema: RowSchema) -> Result<(), ReassemblyError> {
        if self.schema.is_some() {
            return Err(ReassemblyError::UnexpectedSchema);
        }
        if schema.width() == 0 {
            return Err(ReassemblyError::EmptySchema);
        }
        debug!(width = schema.width(), "schema installed");
        self.schema = Some(schema);
        Ok(())
    }
}
