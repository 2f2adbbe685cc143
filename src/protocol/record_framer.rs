//! Record framer for re-segmenting a datagram stream.
//!
//! Uses `bytes::BytesMut` as the accumulation buffer. Each datagram is
//! scanned byte by byte:
//! - delimiter: the buffered bytes become a [`Record`] and go to the sink
//! - any other byte: appended, then checked against `max_size`
//!
//! Bytes after the last delimiter of a datagram stay buffered, so a record
//! may span any number of datagrams.
//!
//! # Example
//!
//! ```
//! use udp_record_source::protocol::{Record, RecordFramer};
//!
//! let mut framer = RecordFramer::new(b'\n', 10, Vec::<Record>::new());
//!
//! framer.process_datagram(b"ab");
//! framer.process_datagram(b"cd\nefgh\n");
//! framer.process_datagram(b"ij");
//!
//! let records = framer.sink();
//! assert_eq!(records[0].as_bytes(), b"abcd");
//! assert_eq!(records[1].as_bytes(), b"efgh");
//! assert_eq!(framer.pending(), b"ij");
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::Record;
use crate::config::SourceConfig;
use crate::error::Result;
use crate::sink::EventSink;

/// Default delimiter (newline).
pub const DEFAULT_DELIMITER: u8 = b'\n';

/// Default maximum record size.
pub const DEFAULT_MAX_SIZE: usize = 64 * 1024;

/// Policy applied when a second or later record inside one datagram reaches
/// `max_size`.
///
/// In both cases the rest of the datagram is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryOverflow {
    /// Leave the oversized partial tail in the buffer. The next datagram
    /// continues from it.
    #[default]
    Retain,
    /// Discard the partial tail, same as a first-record overflow.
    Clear,
}

/// Policy used unless one is chosen explicitly.
pub const DEFAULT_SECONDARY_OVERFLOW: SecondaryOverflow = SecondaryOverflow::Retain;

/// Counters kept by a framer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramerStats {
    /// Datagrams passed to `process_datagram`.
    pub datagrams: u64,
    /// Records accepted by the sink.
    pub records_emitted: u64,
    /// Records the sink refused.
    pub records_rejected: u64,
    /// Records discarded because no delimiter arrived within `max_size`.
    pub oversized_dropped: u64,
    /// Datagrams abandoned because a later record in them hit `max_size`.
    pub secondary_overflows: u64,
}

/// Stateful framer turning datagrams into delimiter-terminated records.
///
/// Not internally synchronized: one framer per socket, driven by one task.
pub struct RecordFramer<S> {
    /// Partial record carried across datagrams.
    buffer: BytesMut,
    delimiter: u8,
    /// Upper bound on buffer length and on every emitted record.
    max_size: usize,
    policy: SecondaryOverflow,
    sink: S,
    stats: FramerStats,
}

impl<S: EventSink> RecordFramer<S> {
    /// Create a framer with the default secondary overflow policy.
    ///
    /// `max_size` must be positive; a zero value is raised to 1.
    pub fn new(delimiter: u8, max_size: usize, sink: S) -> Self {
        Self::with_policy(delimiter, max_size, DEFAULT_SECONDARY_OVERFLOW, sink)
    }

    /// Create a framer with an explicit secondary overflow policy.
    pub fn with_policy(
        delimiter: u8,
        max_size: usize,
        policy: SecondaryOverflow,
        sink: S,
    ) -> Self {
        let max_size = max_size.max(1);
        Self {
            buffer: BytesMut::with_capacity(max_size.min(DEFAULT_MAX_SIZE)),
            delimiter,
            max_size,
            policy,
            sink,
            stats: FramerStats::default(),
        }
    }

    /// Create a framer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Config` if the delimiter or size is invalid.
    pub fn from_config(config: &SourceConfig, policy: SecondaryOverflow, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_policy(
            config.delimiter_byte()?,
            config.max_size,
            policy,
            sink,
        ))
    }

    /// Scan one datagram, pushing every completed record to the sink.
    ///
    /// Any input is accepted, including an empty datagram.
    pub fn process_datagram(&mut self, datagram: &[u8]) {
        self.stats.datagrams += 1;
        tracing::trace!(len = datagram.len(), pending = self.buffer.len(), "datagram");

        // Scoped to this datagram only.
        let mut delimiter_met = false;

        for &byte in datagram {
            if byte == self.delimiter {
                let body = self.buffer.split().freeze();
                self.emit(body);
                delimiter_met = true;
                continue;
            }

            if self.buffer.len() >= self.max_size {
                // Saturated tail retained from the previous datagram. One more
                // byte would exceed max_size, so this is a first-record overflow.
                self.drop_oversized();
                return;
            }

            self.buffer.put_u8(byte);

            if self.buffer.len() == self.max_size {
                if delimiter_met {
                    self.secondary_overflow();
                } else {
                    self.drop_oversized();
                }
                return;
            }
        }
    }

    /// Hand one record to the sink. A rejection loses only this record.
    fn emit(&mut self, body: Bytes) {
        let len = body.len();
        match self.sink.accept(Record::new(body)) {
            Ok(()) => self.stats.records_emitted += 1,
            Err(e) => {
                self.stats.records_rejected += 1;
                tracing::error!(len, "Error occurred when writing record to sink: {}", e);
            }
        }
    }

    fn drop_oversized(&mut self) {
        tracing::warn!(
            len = self.buffer.len(),
            max_size = self.max_size,
            "Record larger than max size, dropping it and the rest of the datagram"
        );
        self.buffer.clear();
        self.stats.oversized_dropped += 1;
    }

    fn secondary_overflow(&mut self) {
        tracing::warn!(
            len = self.buffer.len(),
            max_size = self.max_size,
            policy = ?self.policy,
            "Record after a delimiter reached max size, skipping rest of the datagram"
        );
        if self.policy == SecondaryOverflow::Clear {
            self.buffer.clear();
        }
        self.stats.secondary_overflows += 1;
    }
}

impl<S> RecordFramer<S> {
    /// Bytes buffered since the last record boundary.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline]
    pub fn policy(&self) -> SecondaryOverflow {
        self.policy
    }

    /// Snapshot of the counters.
    #[inline]
    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Discard any partial record. Configuration, sink and counters are kept.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Tear the framer down, returning the sink and the unterminated tail.
    pub fn close(self) -> (S, Bytes) {
        if !self.buffer.is_empty() {
            tracing::debug!(len = self.buffer.len(), "Framer closed with a partial record");
        }
        (self.sink, self.buffer.freeze())
    }
}
