//! Error types for udp-record-source.

use thiserror::Error;

/// Rejection returned by an [`EventSink`](crate::sink::EventSink).
///
/// The framer treats every variant the same way: the record is dropped,
/// the rejection is logged and framing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The sink has no room for another record right now.
    #[error("sink is full")]
    Full,

    /// The consumer behind the sink has gone away.
    #[error("sink is closed")]
    Closed,

    /// Sink-specific admission failure.
    #[error("record rejected: {0}")]
    Rejected(String),
}

/// Main error type for configuration and runtime operations.
#[derive(Debug, Error)]
pub enum SourceError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Stop was already requested for this source.
    #[error("Source already stopped")]
    AlreadyStopped,

    /// The receive loop task panicked or was cancelled.
    #[error("Receive task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type alias using SourceError.
pub type Result<T> = std::result::Result<T, SourceError>;
