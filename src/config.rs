//! Source configuration.
//!
//! Values arrive as JSON (or any serde format) with camelCase keys:
//!
//! ```json
//! { "host": "0.0.0.0", "port": 5140, "delimiter": "\n", "maxSize": 65536 }
//! ```
//!
//! Only `port` is required.
//!
//! # Example
//!
//! ```
//! use udp_record_source::config::SourceConfig;
//!
//! let config = SourceConfig::from_json(r#"{"port": 5140, "delimiter": "|"}"#).unwrap();
//! assert_eq!(config.port, 5140);
//! assert_eq!(config.delimiter_byte().unwrap(), b'|');
//! assert_eq!(config.max_size, 65536);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};
use crate::protocol::{DEFAULT_DELIMITER, DEFAULT_MAX_SIZE};

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Configuration for one UDP source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Interface to bind; used by the receiver only.
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Single ASCII character terminating each record.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Maximum record length in bytes.
    #[serde(default = "default_max_size", alias = "max_size")]
    pub max_size: usize,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_delimiter() -> String {
    char::from(DEFAULT_DELIMITER).to_string()
}

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}

impl SourceConfig {
    /// Create a configuration for `port` with every other value defaulted.
    pub fn new(port: u16) -> Self {
        Self {
            host: default_host(),
            port,
            delimiter: default_delimiter(),
            max_size: default_max_size(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Json` for malformed input or a missing `port`,
    /// `SourceError::Config` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SourceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the framer and receiver depend on.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(SourceError::Config("host must not be empty".into()));
        }
        if self.max_size == 0 {
            return Err(SourceError::Config("maxSize must be positive".into()));
        }
        self.delimiter_byte()?;
        Ok(())
    }

    /// The delimiter as the byte the framer compares against.
    pub fn delimiter_byte(&self) -> Result<u8> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            (Some(c), None) => Err(SourceError::Config(format!(
                "delimiter {:?} is not a single-byte character",
                c
            ))),
            (None, _) => Err(SourceError::Config("delimiter must not be empty".into())),
            (Some(_), Some(_)) => Err(SourceError::Config(format!(
                "delimiter {:?} must be exactly one character",
                self.delimiter
            ))),
        }
    }

    /// `host:port` string for socket binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SourceConfig::new(9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.delimiter_byte().unwrap(), b'\n');
        assert_eq!(config.max_size, 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_full() {
        let config = SourceConfig::from_json(
            r#"{"host": "127.0.0.1", "port": 5140, "delimiter": ";", "maxSize": 128}"#,
        )
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5140);
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.max_size, 128);
        assert_eq!(config.bind_addr(), "127.0.0.1:5140");
    }

    #[test]
    fn test_from_json_snake_case_alias() {
        let config = SourceConfig::from_json(r#"{"port": 1, "max_size": 10}"#).unwrap();
        assert_eq!(config.max_size, 10);
    }

    #[test]
    fn test_from_json_escaped_newline() {
        let config = SourceConfig::from_json(r#"{"port": 1, "delimiter": "\n"}"#).unwrap();
        assert_eq!(config.delimiter_byte().unwrap(), b'\n');
    }

    #[test]
    fn test_missing_port() {
        let result = SourceConfig::from_json(r#"{"host": "0.0.0.0"}"#);
        assert!(matches!(result, Err(SourceError::Json(_))));
    }

    #[test]
    fn test_zero_max_size() {
        let result = SourceConfig::from_json(r#"{"port": 1, "maxSize": 0}"#);
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[test]
    fn test_multi_char_delimiter_rejected() {
        let config = SourceConfig::new(1).with_delimiter("\r\n");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exactly one character"));
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let config = SourceConfig::new(1).with_delimiter("");
        assert!(matches!(config.validate(), Err(SourceError::Config(_))));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = SourceConfig::new(1).with_delimiter("é");
        assert!(matches!(config.delimiter_byte(), Err(SourceError::Config(_))));
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let json = serde_json::to_string(&SourceConfig::new(7)).unwrap();
        assert!(json.contains("\"maxSize\":65536"));
    }
}
