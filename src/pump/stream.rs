//! Demand-paced bridge from the transport to the reassembler.
//!
//! `RowStream` consumes one inbound partial result message at a time, feeds
//! it to the [`Reassembler`], and yields the resulting rows downstream as a
//! [`futures::Stream`]. Demand policy: one message is requested on the first
//! poll, and exactly one more after each inbound message has been fully
//! processed and its rows delivered. At most one undelivered message is ever
//! in flight, so memory use is bounded by the transport's own message-size
//! ceiling.

use std::{
    collections::VecDeque,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{Stream, StreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use super::subscription::MessageSubscription;
use crate::{
    message::PartialMessage,
    reassembler::{Reassembler, ReassemblyError},
    row::Row,
};

/// Error yielded by a [`RowStream`].
///
/// Distinguishes transport faults from a malformed or unexpected server
/// stream so callers can tell a network failure from a protocol bug.
#[derive(Debug, Error)]
pub enum StreamError<E> {
    /// An error in the underlying transport call.
    #[error("transport failure in result stream: {0}")]
    Transport(E),
    /// A protocol violation detected during reassembly.
    #[error("malformed result stream: {0}")]
    Protocol(#[from] ReassemblyError),
}

/// Pump lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PumpState {
    /// Not yet polled; no demand issued.
    Idle,
    /// Initial demand issued, first message not yet received.
    AwaitingFirst,
    /// At least one message consumed; streaming rows.
    Streaming,
    /// Transport signalled natural end-of-stream.
    Completed,
    /// A transport or protocol error ended the stream.
    Failed,
    /// The downstream consumer cancelled the stream.
    Cancelled,
}

impl PumpState {
    const fn is_terminal(self) -> bool {
        matches!(
            self,
            PumpState::Completed | PumpState::Failed | PumpState::Cancelled
        )
    }
}

/// Streaming row source for one query execution.
///
/// Wraps a [`MessageSubscription`] and an exclusively owned [`Reassembler`];
/// processing is strictly serial, which is what makes the reassembler's
/// non-concurrent design safe.
///
/// # Examples
///
/// ```
/// use futures::StreamExt;
/// use rowframe::{
///     message::PartialMessage,
///     pump::{ChannelSubscription, RowStream},
///     schema::{Column, ColumnType, RowSchema},
///     value::Value,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (subscription, mut handle) = ChannelSubscription::<std::io::Error>::channel(1);
/// let mut rows = RowStream::new(subscription);
///
/// tokio::spawn(async move {
///     let schema = RowSchema::new(vec![Column::new("word", ColumnType::String)]);
///     let message = PartialMessage::new(vec![Value::from("hi")], false).with_schema(schema);
///     if handle.demanded().await.is_some() {
///         let _ = handle.send(Ok(message)).await;
///     }
/// });
///
/// let row = rows.next().await.expect("one row").expect("no error");
/// assert_eq!(row.values(), &[Value::from("hi")]);
/// assert!(rows.next().await.is_none());
/// # }
/// ```
#[derive(Debug)]
pub struct RowStream<S: MessageSubscription> {
    subscription: S,
    reassembler: Reassembler,
    ready: VecDeque<Row>,
    state: PumpState,
    /// Demand owed for the last consumed message, deferred until its rows
    /// have been delivered downstream.
    owe_request: bool,
}

impl<S: MessageSubscription> RowStream<S> {
    /// Wrap a subscription; no demand is issued until the first poll.
    #[must_use]
    pub fn new(subscription: S) -> Self {
        Self {
            subscription,
            reassembler: Reassembler::new(),
            ready: VecDeque::new(),
            state: PumpState::Idle,
            owe_request: false,
        }
    }

    /// Current pump lifecycle state.
    #[must_use]
    pub fn state(&self) -> PumpState { self.state }

    #[cfg(test)]
    pub(crate) fn subscription(&self) -> &S { &self.subscription }

    /// Whether reassembly ended on a row boundary with no live carry.
    ///
    /// Meaningful once the stream has completed; the query layer decides
    /// whether a violation is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::TruncatedStream`] when a partial row or a
    /// carried value remains.
    pub fn ensure_drained(&self) -> Result<(), ReassemblyError> {
        self.reassembler.ensure_drained()
    }

    /// Cancel the stream: stop issuing demand, abort the transport call, and
    /// discard buffered rows and partial reassembly state.
    ///
    /// The reassembler is never invoked again after cancellation.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        debug!("row stream cancelled by consumer");
        self.subscription.cancel();
        self.ready.clear();
        self.owe_request = false;
        self.state = PumpState::Cancelled;
    }

    fn consume(&mut self, message: PartialMessage) -> Result<(), StreamError<S::Error>> {
        match self.reassembler.process(message) {
            Ok(rows) => {
                #[cfg(feature = "metrics")]
                {
                    crate::metrics::inc_messages();
                    crate::metrics::inc_rows(rows.len() as u64);
                }
                self.ready.extend(rows);
                self.state = PumpState::Streaming;
                self.owe_request = true;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "reassembly failed; aborting stream");
                #[cfg(feature = "metrics")]
                crate::metrics::inc_errors("protocol");
                self.state = PumpState::Failed;
                Err(StreamError::Protocol(err))
            }
        }
    }
}

impl<S: MessageSubscription + Unpin> Stream for RowStream<S> {
    type Item = Result<Row, StreamError<S::Error>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(row) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(row)));
            }
            if this.state.is_terminal() {
                return Poll::Ready(None);
            }
            if this.state == PumpState::Idle {
                this.subscription.request(1);
                this.state = PumpState::AwaitingFirst;
            } else if this.owe_request {
                this.subscription.request(1);
                this.owe_request = false;
            }

            match this.subscription.poll_message(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => {
                    debug!("partial result stream completed");
                    this.state = PumpState::Completed;
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(Err(err))) => {
                    warn!("transport failure in result stream");
                    #[cfg(feature = "metrics")]
                    crate::metrics::inc_errors("transport");
                    this.state = PumpState::Failed;
                    return Poll::Ready(Some(Err(StreamError::Transport(err))));
                }
                Poll::Ready(Some(Ok(message))) => {
                    if let Err(err) = this.consume(message) {
                        return Poll::Ready(Some(Err(err)));
                    }
                }
            }
        }
    }
}

impl<S: MessageSubscription + Unpin> RowStream<S> {
    /// Drain the stream into a vector, then apply the end-of-stream drain
    /// check on behalf of the caller layer.
    ///
    /// # Errors
    ///
    /// Returns the first [`StreamError`] yielded by the stream, or
    /// [`ReassemblyError::TruncatedStream`] when the stream completed with a
    /// partial trailing row.
    pub async fn collect_rows(mut self) -> Result<Vec<Row>, StreamError<S::Error>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next().await {
            rows.push(row?);
        }
        if self.state == PumpState::Completed {
            self.ensure_drained()?;
        }
        Ok(rows)
    }
}
