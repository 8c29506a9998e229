// src/acquisition/event_stream.rs
//! Bounded, ordered delivery of gesture messages to consumers
//!
//! The polling loop publishes into a bounded FIFO queue; consumers pull
//! from it at their own pace. A full queue throttles the publisher
//! rather than dropping or reordering messages. When the queue
//! disconnects, consumers learn whether the shutdown was orderly or
//! caused by a fatal transport error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, SendTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use thiserror::Error;

use crate::config::constants::stream;
use crate::error::GesticError;
use crate::message::GestureMessage;

/// Slot where the polling loop records a fatal error before the queue
/// disconnects.
pub(crate) type FaultSlot = Arc<Mutex<Option<GesticError>>>;

/// Why the stream stopped producing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamClosed {
    /// Orderly shutdown: the device handle closed the session.
    #[error("gesture stream closed")]
    Closed,
    /// The polling loop stopped on a fatal transport error.
    #[error("gesture stream terminated: {0}")]
    Fault(GesticError),
}

/// Outcome of one publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Publish {
    /// The message was queued.
    Sent,
    /// The stop flag was raised while waiting for a free slot.
    Stopped,
    /// Every consumer handle was dropped.
    ConsumersGone,
}

/// Producer half, owned by the polling loop.
pub(crate) struct EventPublisher {
    tx: Sender<GestureMessage>,
    fault: FaultSlot,
}

impl EventPublisher {
    /// Publish with backpressure. Waits while the queue is at capacity,
    /// re-checking `stop` so a shutdown request is never stuck behind a
    /// slow consumer.
    pub(crate) fn publish(&self, message: GestureMessage, stop: &AtomicBool) -> Publish {
        let interval = Duration::from_millis(stream::PUBLISH_STOP_POLL_MS);
        let mut pending = message;
        loop {
            if stop.load(Ordering::Acquire) {
                return Publish::Stopped;
            }
            match self.tx.send_timeout(pending, interval) {
                Ok(()) => return Publish::Sent,
                Err(SendTimeoutError::Timeout(returned)) => pending = returned,
                Err(SendTimeoutError::Disconnected(_)) => return Publish::ConsumersGone,
            }
        }
    }

    /// Record the fatal error consumers will see once the queue drains.
    pub(crate) fn record_fault(&self, error: GesticError) {
        *self.fault.lock() = Some(error);
    }
}

/// Receiving half of the gesture event stream.
///
/// Clones share one bounded queue: each message is delivered to exactly
/// one receiver, in publish order. Messages already queued when the
/// producer goes away remain receivable; only then does the stream
/// report its terminal condition.
#[derive(Debug, Clone)]
pub struct EventStream {
    rx: Receiver<GestureMessage>,
    fault: FaultSlot,
}

impl EventStream {
    /// Wait for the next message.
    pub fn recv(&self) -> Result<GestureMessage, StreamClosed> {
        self.rx.recv().map_err(|_| self.closed_reason())
    }

    /// Take the next message if one is already queued. `Ok(None)` means
    /// the stream is alive but empty right now.
    pub fn try_recv(&self) -> Result<Option<GestureMessage>, StreamClosed> {
        match self.rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(self.closed_reason()),
        }
    }

    /// Wait up to `timeout` for the next message. `Ok(None)` means the
    /// wait timed out with the stream still alive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<GestureMessage>, StreamClosed> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(self.closed_reason()),
        }
    }

    /// Blocking iterator over messages until the stream terminates.
    pub fn iter(&self) -> impl Iterator<Item = GestureMessage> + '_ {
        self.rx.iter()
    }

    /// Messages currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True when no message is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Capacity of the bounded queue.
    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(0)
    }

    fn closed_reason(&self) -> StreamClosed {
        match self.fault.lock().clone() {
            Some(error) => StreamClosed::Fault(error),
            None => StreamClosed::Closed,
        }
    }
}

/// Build the producer/consumer pair around one bounded queue.
pub(crate) fn stream_pair(capacity: usize, fault: FaultSlot) -> (EventPublisher, EventStream) {
    let (tx, rx) = channel::bounded(capacity);
    (
        EventPublisher {
            tx,
            fault: fault.clone(),
        },
        EventStream { rx, fault },
    )
}
