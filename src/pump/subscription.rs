//! Pull-based transport boundary for partial result streams.
//!
//! The RPC layer exposes the streaming call to the pump through
//! [`MessageSubscription`]: the pump asks for messages with `request`, polls
//! them out with `poll_message`, and aborts the call with `cancel`.
//! [`ChannelSubscription`] adapts any producer that can honour a demand
//! channel, which covers both the gRPC adapter above this crate and the
//! integration tests.

use std::task::{Context, Poll};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::message::PartialMessage;

/// The consumer side of a subscription has been dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("subscription consumer is gone")]
pub struct SubscriptionClosed;

/// Pull-based subscription to a partial-result streaming call.
///
/// Implementations deliver messages only against previously requested
/// demand. The pump issues demand one message at a time, so at most one
/// undelivered message is ever in flight.
pub trait MessageSubscription: Send {
    /// Transport-level failure type.
    type Error: Send + 'static;

    /// Ask the transport for `n` more messages.
    fn request(&mut self, n: u64);

    /// Abort the underlying call; no further messages will be delivered.
    fn cancel(&mut self);

    /// Poll for the next requested message.
    ///
    /// `Poll::Ready(None)` signals natural end-of-stream.
    fn poll_message(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<PartialMessage, Self::Error>>>;
}

/// Channel-backed [`MessageSubscription`].
///
/// Messages arrive on a bounded channel, demand flows back to the producer
/// on an unbounded one, and cancellation is signalled through a
/// [`CancellationToken`].
#[derive(Debug)]
pub struct ChannelSubscription<E> {
    messages: mpsc::Receiver<Result<PartialMessage, E>>,
    demand: mpsc::UnboundedSender<u64>,
    cancel: CancellationToken,
}

impl<E: Send + 'static> ChannelSubscription<E> {
    /// Create a subscription plus the producer-side handle.
    ///
    /// `buffer` bounds the message channel; one is enough under the pump's
    /// demand policy.
    #[must_use]
    pub fn channel(buffer: usize) -> (Self, SubscriptionHandle<E>) {
        let (message_tx, message_rx) = mpsc::channel(buffer);
        let (demand_tx, demand_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let subscription = Self {
            messages: message_rx,
            demand: demand_tx,
            cancel: cancel.clone(),
        };
        let handle = SubscriptionHandle {
            messages: message_tx,
            demand: demand_rx,
            cancel,
        };
        (subscription, handle)
    }
}

impl<E: Send + 'static> MessageSubscription for ChannelSubscription<E> {
    type Error = E;

    fn request(&mut self, n: u64) {
        // A dropped producer is equivalent to end-of-stream; poll_message
        // reports it.
        let _ = self.demand.send(n);
    }

    fn cancel(&mut self) {
        debug!("subscription cancelled");
        self.cancel.cancel();
        self.messages.close();
    }

    fn poll_message(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<PartialMessage, Self::Error>>> {
        self.messages.poll_recv(cx)
    }
}

/// Producer side of a [`ChannelSubscription`].
///
/// The RPC adapter waits for demand, forwards that many messages from the
/// wire, and watches the cancellation token to abort the call.
#[derive(Debug)]
pub struct SubscriptionHandle<E> {
    messages: mpsc::Sender<Result<PartialMessage, E>>,
    demand: mpsc::UnboundedReceiver<u64>,
    cancel: CancellationToken,
}

impl<E: Send + 'static> SubscriptionHandle<E> {
    /// Wait for the next demand request.
    ///
    /// Returns `None` when the subscription has been dropped or cancelled.
    pub async fn demanded(&mut self) -> Option<u64> {
        tokio::select! {
            () = self.cancel.cancelled() => None,
            demand = self.demand.recv() => demand,
        }
    }

    /// Deliver one message against previously received demand.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionClosed`] when the consumer is gone.
    pub async fn send(
        &mut self,
        message: Result<PartialMessage, E>,
    ) -> Result<(), SubscriptionClosed> {
        self.messages
            .send(message)
            .await
            .map_err(|_| SubscriptionClosed)
    }

    /// Whether the consumer has cancelled the stream.
    #[must_use]
    pub fn is_cancelled(&self) -> bool { self.cancel.is_cancelled() }
}
