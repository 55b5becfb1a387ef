//! Streaming-consumption wrapper pairing reassembly with flow control.
//!
//! [`RowStream`] drives the [`Reassembler`](crate::reassembler::Reassembler)
//! from a pull-based transport subscription: one message of demand at a
//! time, rows forwarded downstream in order, errors and completion
//! propagated, cancellation pushed back to the transport.

mod stream;
mod subscription;

pub use stream::{PumpState, RowStream, StreamError};
pub use subscription::{
    ChannelSubscription,
    MessageSubscription,
    SubscriptionClosed,
    SubscriptionHandle,
};
