//! Transport module - UDP socket handling.
//!
//! Only UDP is supported. The receiver delivers raw payloads; all framing
//! lives in [`crate::protocol`].

mod udp;

pub use udp::{DatagramReceiver, MAX_DATAGRAM_SIZE};
