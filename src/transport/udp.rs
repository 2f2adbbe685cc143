//! UDP datagram receiver.
//!
//! Thin wrapper around `tokio::net::UdpSocket`: bind, then hand out one
//! payload per `recv` call in arrival order. No reordering, deduplication
//! or loss recovery happens here.
//!
//! # Example
//!
//! ```ignore
//! use udp_record_source::transport::DatagramReceiver;
//!
//! let mut receiver = DatagramReceiver::bind("127.0.0.1:0").await?;
//! let datagram = receiver.recv().await?;
//! ```

use std::net::SocketAddr;

use tokio::net::{ToSocketAddrs, UdpSocket};

use crate::error::Result;

/// Receive buffer size. Covers the largest UDP payload (65,507 bytes over IPv4).
pub const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// Bound UDP socket with a reusable receive buffer.
pub struct DatagramReceiver {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl DatagramReceiver {
    /// Bind to the given address.
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        tracing::debug!(addr = ?socket.local_addr().ok(), "UDP receiver bound");
        Ok(Self::from_socket(socket))
    }

    /// Wrap an already bound socket.
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self {
            socket,
            buf: vec![0u8; MAX_DATAGRAM_SIZE],
        }
    }

    /// Receive the next datagram payload.
    ///
    /// The returned slice borrows the internal buffer and is valid until the
    /// next call.
    pub async fn recv(&mut self) -> Result<&[u8]> {
        let (n, _peer) = self.recv_from().await?;
        Ok(&self.buf[..n])
    }

    /// Receive the next datagram, returning its length and sender.
    ///
    /// The payload is available through [`last_datagram`](Self::last_datagram).
    pub async fn recv_from(&mut self) -> Result<(usize, SocketAddr)> {
        let (n, peer) = self.socket.recv_from(&mut self.buf).await?;
        Ok((n, peer))
    }

    /// Payload of a datagram previously reported by `recv_from`.
    #[inline]
    pub fn last_datagram(&self, len: usize) -> &[u8] {
        &self.buf[..len.min(self.buf.len())]
    }

    /// Get the bound local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}
