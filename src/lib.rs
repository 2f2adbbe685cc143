//! # udp-record-source
//!
//! Re-segments a stream of UDP datagrams into delimiter-terminated records.
//!
//! A record may span several datagrams and a datagram may carry several
//! records. The [`RecordFramer`](protocol::RecordFramer) keeps the partial
//! record between datagrams, enforces a maximum record size and pushes each
//! completed record to an [`EventSink`](sink::EventSink).
//!
//! ## Architecture
//!
//! - **Transport**: [`DatagramReceiver`](transport::DatagramReceiver), one payload per datagram
//! - **Protocol**: [`RecordFramer`](protocol::RecordFramer), the only stateful piece
//! - **Sink**: narrow push interface that may reject records
//!
//! ## Example
//!
//! ```ignore
//! use udp_record_source::config::SourceConfig;
//! use udp_record_source::sink::channel_sink;
//! use udp_record_source::SourceBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (sink, mut records) = channel_sink(1024);
//!     let source = SourceBuilder::new(SourceConfig::new(5140))
//!         .start(sink)
//!         .await
//!         .unwrap();
//!
//!     while let Some(record) = records.recv().await {
//!         println!("{} bytes", record.len());
//!     }
//!
//!     source.stop().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod sink;
pub mod transport;

mod source;

pub use error::{SinkError, SourceError};
pub use protocol::{Record, RecordFramer, SecondaryOverflow};
pub use sink::EventSink;
pub use source::{SourceBuilder, UdpSource, RECV_ERROR_BACKOFF};
