//! Metric helpers for `rowframe`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate.

use metrics::counter;

/// Name of the counter tracking partial result messages consumed.
pub const MESSAGES_PROCESSED: &str = "rowframe_messages_processed_total";
/// Name of the counter tracking rows emitted downstream.
pub const ROWS_EMITTED: &str = "rowframe_rows_emitted_total";
/// Name of the counter tracking stream-fatal errors.
pub const STREAM_ERRORS: &str = "rowframe_stream_errors_total";

/// Record a consumed partial result message.
pub fn inc_messages() { counter!(MESSAGES_PROCESSED).increment(1); }

/// Record rows emitted to the downstream consumer.
pub fn inc_rows(count: u64) { counter!(ROWS_EMITTED).increment(count); }

/// Record a stream-fatal error, labelled by origin.
pub fn inc_errors(origin: &'static str) {
    counter!(STREAM_ERRORS, "origin" => origin).increment(1);
}
