#![doc(html_root_url = "https://docs.rs/rowframe/latest")]
//! Streaming-result layer for a distributed SQL driver.
//!
//! A query's rows arrive as a sequence of partial result messages; the
//! server may split one column value across two consecutive messages when
//! it reaches the transport's message-size ceiling. This crate reassembles
//! those fragments into complete, fixed-width rows without buffering the
//! result set, under pull-based flow control:
//!
//! - [`reassembler::Reassembler`] is the pure, synchronous chunk-merge state
//!   machine, one `process` call per inbound message.
//! - [`pump::RowStream`] pairs it with a transport subscription, requesting
//!   one message of demand at a time and yielding rows as a
//!   [`futures::Stream`].
//!
//! Connection setup, value typing, and statement handling live in the
//! driver layers around this crate.

pub mod message;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod pump;
pub mod reassembler;
pub mod row;
pub mod schema;
pub mod value;

pub use message::PartialMessage;
pub use pump::{ChannelSubscription, MessageSubscription, PumpState, RowStream, StreamError};
pub use reassembler::{Reassembler, ReassemblyError};
pub use row::Row;
pub use schema::{Column, ColumnType, RowSchema};
pub use value::{Value, ValueKind};
