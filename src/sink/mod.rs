//! Sink module - the downstream push interface.
//!
//! The framer hands every completed record to an [`EventSink`]. A sink may
//! refuse a record; the framer logs the refusal, drops that record and keeps
//! going. It never retries.
//!
//! Implementations:
//! - `Vec<Record>` - collects every record, never rejects
//! - [`ChannelSink`] - bounded tokio channel, rejects when full or closed
//! - [`FnSink`] - wraps a closure
//!
//! # Example
//!
//! ```
//! use udp_record_source::protocol::{Record, RecordFramer};
//! use udp_record_source::sink::FnSink;
//!
//! let mut seen = 0usize;
//! let sink = FnSink::new(|record: Record| {
//!     seen += record.len();
//!     Ok(())
//! });
//!
//! let mut framer = RecordFramer::new(b'\n', 1024, sink);
//! framer.process_datagram(b"abc\n");
//! drop(framer);
//! assert_eq!(seen, 3);
//! ```

mod channel;

pub use channel::{channel_sink, ChannelSink, DEFAULT_CHANNEL_CAPACITY};

use crate::error::SinkError;
use crate::protocol::Record;

/// Consumer of completed records.
pub trait EventSink {
    /// Take ownership of one record.
    ///
    /// Returning an error drops the record; it is not offered again.
    fn accept(&mut self, record: Record) -> Result<(), SinkError>;
}

impl EventSink for Vec<Record> {
    fn accept(&mut self, record: Record) -> Result<(), SinkError> {
        self.push(record);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn accept(&mut self, record: Record) -> Result<(), SinkError> {
        (**self).accept(record)
    }
}

/// Sink adapter around a closure.
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(Record) -> Result<(), SinkError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(Record) -> Result<(), SinkError>,
{
    fn accept(&mut self, record: Record) -> Result<(), SinkError> {
        (self.f)(record)
    }
}
