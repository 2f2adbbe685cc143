//! UDP to stdout - prints every record received on a UDP port.
//!
//! Configuration is read as JSON from the first argument, e.g.
//!
//! ```text
//! cargo run --example udp_to_stdout -- '{"port": 5140, "maxSize": 1024}'
//! ```
//!
//! Then send some datagrams:
//!
//! ```text
//! printf 'hello\nwor' | nc -u -w0 127.0.0.1 5140
//! printf 'ld\n' | nc -u -w0 127.0.0.1 5140
//! ```
//!
//! Set `RUST_LOG=udp_record_source=debug` to see framer warnings and
//! lifecycle events.

use std::io::Write;

use tracing_subscriber::EnvFilter;
use udp_record_source::config::SourceConfig;
use udp_record_source::sink::{channel_sink, DEFAULT_CHANNEL_CAPACITY};
use udp_record_source::SourceBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let json = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r#"{"port": 5140}"#.to_string());
    let config = SourceConfig::from_json(&json)?;

    let (sink, mut records) = channel_sink(DEFAULT_CHANNEL_CAPACITY);
    let source = SourceBuilder::new(config).start(sink).await?;
    tracing::info!(addr = %source.local_addr(), "listening");

    loop {
        tokio::select! {
            record = records.recv() => {
                let Some(record) = record else { break };
                // Records are opaque bytes; write them back out unchanged.
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(record.as_bytes())?;
                stdout.write_all(b"\n")?;
                stdout.flush()?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let framer = source.stop().await?;
    let (_sink, tail) = framer.close();
    if !tail.is_empty() {
        tracing::warn!(len = tail.len(), "discarding unterminated record");
    }

    Ok(())
}
