//! Error types for partial-result reassembly.
//!
//! Every variant is fatal to the current query stream: reassembly state
//! cannot be rewound to a mid-stream checkpoint, so callers abort the stream
//! and, if desired, re-issue the whole call at the query-execution layer.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors produced by [`Reassembler`](super::Reassembler).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// A value arrived before any schema was installed.
    #[error("value received before any schema was installed")]
    MissingSchema,

    /// A schema arrived on a message after the first; the server and client
    /// have desynchronized.
    #[error("schema received after the first message of the stream")]
    UnexpectedSchema,

    /// The installed schema declares zero columns, so no row could ever
    /// complete.
    #[error("schema declares zero columns")]
    EmptySchema,

    /// A carried incomplete value and the next message's leading value are
    /// not the same mergeable variant.
    #[error("chunk continuation mismatch: carried {carried} cannot absorb {incoming}")]
    ChunkMergeMismatch {
        /// Variant held over from the previous message.
        carried: ValueKind,
        /// Variant that arrived as the continuation.
        incoming: ValueKind,
    },

    /// A message declared `chunked = true` while carrying zero values.
    #[error("message marked chunked carries no values")]
    EmptyChunkedMessage,

    /// The stream ended with a partly built row or an unfinished carried
    /// value.
    #[error("stream ended with an incomplete trailing row")]
    TruncatedStream,
}
