//! Per-client outbound queue
//!
//! Many writers (command handlers, dispatch tasks, persistence tasks) feed a
//! single reader, the socket writer. The queue is bounded and writers never
//! wait: when it is full the message is dropped and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::protocol::OutboundMessage;

/// Default number of messages buffered per client
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Cloneable sending half of a client's outbound queue
#[derive(Clone, Debug)]
pub struct OutboundSink {
    tx: mpsc::Sender<OutboundMessage>,
    dropped: Arc<AtomicU64>,
}

impl OutboundSink {
    /// Create a sink and the receiver the socket writer drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Enqueue a message without waiting; returns whether it was accepted
    pub fn send(&self, message: OutboundMessage) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    kind = message.kind(),
                    dropped,
                    "outbound queue full, dropping message"
                );
                false
            }
            // Receiver gone: the connection is closing
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Enqueue an `error` message
    pub fn error(&self, message: impl ToString) -> bool {
        self.send(OutboundMessage::Error(message.to_string()))
    }

    /// Messages dropped because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
