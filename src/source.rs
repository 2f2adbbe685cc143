//! Source builder and runtime loop.
//!
//! The [`SourceBuilder`] validates configuration and builds the framer. The
//! [`UdpSource`] manages the lifecycle:
//! 1. Bind the UDP socket
//! 2. Spawn the receive loop with one framer
//! 3. Feed every datagram to the framer in arrival order
//! 4. Stop on request and hand the framer back
//!
//! # Example
//!
//! ```ignore
//! use udp_record_source::config::SourceConfig;
//! use udp_record_source::sink::channel_sink;
//! use udp_record_source::SourceBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (sink, mut records) = channel_sink(1024);
//!     let source = SourceBuilder::new(SourceConfig::new(5140)).start(sink).await?;
//!
//!     while let Some(record) = records.recv().await {
//!         println!("{:?}", record);
//!     }
//!
//!     source.stop().await?;
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::SourceConfig;
use crate::error::{Result, SourceError};
use crate::protocol::{FramerStats, RecordFramer, SecondaryOverflow, DEFAULT_SECONDARY_OVERFLOW};
use crate::sink::EventSink;
use crate::transport::DatagramReceiver;

/// Pause after a failed receive before polling the socket again.
pub const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Builder for configuring and starting a UDP source.
#[derive(Debug, Clone)]
pub struct SourceBuilder {
    config: SourceConfig,
    secondary_overflow: SecondaryOverflow,
}

impl SourceBuilder {
    /// Create a new builder from configuration.
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            secondary_overflow: DEFAULT_SECONDARY_OVERFLOW,
        }
    }

    /// Choose what happens to an oversized record that follows a delimiter
    /// inside the same datagram.
    ///
    /// Default: [`SecondaryOverflow::Retain`]
    pub fn secondary_overflow(mut self, policy: SecondaryOverflow) -> Self {
        self.secondary_overflow = policy;
        self
    }

    /// Validate, bind and start the receive loop.
    ///
    /// This will:
    /// 1. Build the framer (fails on invalid configuration)
    /// 2. Bind the socket on `host:port`
    /// 3. Spawn the receive loop
    pub async fn start<S>(self, sink: S) -> Result<UdpSource<S>>
    where
        S: EventSink + Send + 'static,
    {
        let framer = RecordFramer::from_config(&self.config, self.secondary_overflow, sink)?;
        let receiver = DatagramReceiver::bind(self.config.bind_addr()).await?;
        UdpSource::start(receiver, framer)
    }
}

/// A running UDP source.
///
/// Dropping it without calling [`stop`](Self::stop) also ends the receive
/// loop, but the framer and its sink are lost.
pub struct UdpSource<S> {
    local_addr: SocketAddr,
    /// Shutdown signal sender, taken once stop is requested.
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<RecordFramer<S>>,
}

impl<S> UdpSource<S>
where
    S: EventSink + Send + 'static,
{
    /// Run an existing framer on an already bound receiver.
    pub fn start(receiver: DatagramReceiver, framer: RecordFramer<S>) -> Result<Self> {
        let local_addr = receiver.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tracing::debug!(%local_addr, "UDP source started");
        let task = tokio::spawn(receive_loop(receiver, framer, shutdown_rx));

        Ok(Self {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Ask the receive loop to exit without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::AlreadyStopped` if stop was already requested.
    pub fn signal_stop(&mut self) -> Result<()> {
        let tx = self.shutdown_tx.take().ok_or(SourceError::AlreadyStopped)?;
        // Loop may already be gone; nothing to signal then.
        let _ = tx.send(());
        Ok(())
    }

    /// Stop the receive loop and return the framer.
    ///
    /// Any partial record is still in the framer; use
    /// [`RecordFramer::close`] to get at it.
    pub async fn stop(mut self) -> Result<RecordFramer<S>> {
        let _ = self.signal_stop();
        let framer = self.task.await?;
        tracing::debug!(local_addr = %self.local_addr, stats = ?framer.stats(), "UDP source stopped");
        Ok(framer)
    }

    /// Stop the receive loop and keep only the framer counters.
    pub async fn stop_with_stats(self) -> Result<FramerStats> {
        Ok(self.stop().await?.stats())
    }
}

/// Main receive loop - one datagram at a time into the framer.
async fn receive_loop<S: EventSink>(
    mut receiver: DatagramReceiver,
    mut framer: RecordFramer<S>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> RecordFramer<S> {
    loop {
        let received = tokio::select! {
            // Fires on an explicit stop and when the handle is dropped.
            _ = &mut shutdown_rx => break,
            received = receiver.recv_from() => received,
        };

        match received {
            Ok((n, _peer)) => framer.process_datagram(receiver.last_datagram(n)),
            Err(e) => {
                tracing::error!("Receive error: {}", e);
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = tokio::time::sleep(RECV_ERROR_BACKOFF) => {}
                }
            }
        }
    }

    framer
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::UdpSocket;

    use super::*;
    use crate::protocol::Record;
    use crate::sink::channel_sink;

    fn loopback(max_size: usize) -> SourceConfig {
        SourceConfig::new(0)
            .with_host("127.0.0.1")
            .with_max_size(max_size)
    }

    #[test]
    fn test_builder_default_policy() {
        let builder = SourceBuilder::new(SourceConfig::new(0));
        assert_eq!(builder.secondary_overflow, SecondaryOverflow::Retain);
    }

    #[test]
    fn test_builder_configuration() {
        let builder = SourceBuilder::new(SourceConfig::new(0))
            .secondary_overflow(SecondaryOverflow::Clear);
        assert_eq!(builder.secondary_overflow, SecondaryOverflow::Clear);
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let config = loopback(64).with_delimiter("ab");
        let result = SourceBuilder::new(config).start(Vec::<Record>::new()).await;
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[tokio::test]
    async fn test_records_flow_through_channel() {
        let (sink, mut rx) = channel_sink(16);
        let source = SourceBuilder::new(loopback(64)).start(sink).await.unwrap();
        let addr = source.local_addr();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"hel", addr).await.unwrap();
        sender.send_to(b"lo\nworld\n", addr).await.unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.as_bytes(), b"hello");
        assert_eq!(second.as_bytes(), b"world");

        let stats = source.stop_with_stats().await.unwrap();
        assert_eq!(stats.datagrams, 2);
        assert_eq!(stats.records_emitted, 2);
    }

    #[tokio::test]
    async fn test_stop_returns_framer_with_tail() {
        let (sink, mut rx) = channel_sink(16);
        let source = SourceBuilder::new(loopback(64)).start(sink).await.unwrap();
        let addr = source.local_addr();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"done\npart", addr).await.unwrap();

        // The whole datagram is framed before the loop polls for stop again.
        let done = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.as_bytes(), b"done");

        let framer = source.stop().await.unwrap();
        assert_eq!(framer.stats().records_emitted, 1);
        let (_sink, tail) = framer.close();
        assert_eq!(&tail[..], b"part");
    }

    /// A connected socket whose peer is gone reports the ICMP refusal on
    /// the next receive; the loop must survive it and keep framing.
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_loop_survives_receive_error() {
        let peer = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let peer_addr = peer.local_addr().unwrap();
        drop(peer);

        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        socket.connect(peer_addr).await.unwrap();
        socket.send(b"ping").await.unwrap();

        let (sink, mut rx) = channel_sink(16);
        let framer = RecordFramer::new(b'\n', 64, sink);
        let source = UdpSource::start(DatagramReceiver::from_socket(socket), framer).unwrap();
        let addr = source.local_addr();

        // Same address again, so the connected socket accepts its datagrams.
        let peer = UdpSocket::bind(peer_addr).await.unwrap();
        peer.send_to(b"after\n", addr).await.unwrap();

        let record = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.as_bytes(), b"after");

        let stats = source.stop_with_stats().await.unwrap();
        assert_eq!(stats.records_emitted, 1);
    }

    #[tokio::test]
    async fn test_signal_stop_twice() {
        let mut source = SourceBuilder::new(loopback(64))
            .start(Vec::<Record>::new())
            .await
            .unwrap();

        assert!(source.signal_stop().is_ok());
        assert!(matches!(
            source.signal_stop(),
            Err(SourceError::AlreadyStopped)
        ));

        // stop() after signal_stop() still joins cleanly.
        assert!(source.stop().await.is_ok());
    }
}
