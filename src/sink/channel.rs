//! Bounded channel sink.
//!
//! Forwards records into a `tokio::sync::mpsc` channel without ever waiting.
//! The framer runs inside the receive loop, so a blocking sink would stall the
//! socket; instead a full channel is reported as [`SinkError::Full`] and the
//! record is dropped.
//!
//! ```text
//! Receive loop ─► RecordFramer ─► ChannelSink ─► mpsc ─► Consumer task
//! ```

use tokio::sync::mpsc;

use crate::error::SinkError;
use crate::protocol::Record;

use super::EventSink;

/// Default channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Sink that pushes records into a bounded mpsc channel.
///
/// This is cheaply cloneable; clones feed the same receiver.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Record>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::Sender<Record>) -> Self {
        Self { tx }
    }

    /// Number of records that can be queued before the sink starts rejecting.
    #[inline]
    pub fn available_capacity(&self) -> usize {
        self.tx.capacity()
    }

    /// Check if the receiving side has been dropped.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl EventSink for ChannelSink {
    fn accept(&mut self, record: Record) -> Result<(), SinkError> {
        self.tx.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

/// Create a channel sink and the receiver that drains it.
pub fn channel_sink(capacity: usize) -> (ChannelSink, mpsc::Receiver<Record>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelSink::new(tx), rx)
}
