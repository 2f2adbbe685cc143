//! Protocol module - record framing and record types.
//!
//! This module implements the byte-level framing of the datagram stream:
//! - Record framer with a persistent accumulation buffer
//! - Overflow policy for records exceeding `max_size`
//! - Record struct handed to sinks

mod record;
mod record_framer;

pub use record::Record;
pub use record_framer::{
    FramerStats, RecordFramer, SecondaryOverflow, DEFAULT_DELIMITER, DEFAULT_MAX_SIZE,
    DEFAULT_SECONDARY_OVERFLOW,
};
