//! Record type handed to sinks.
//!
//! A record is the opaque byte span between two delimiters. It is never
//! decoded; `bytes::Bytes` keeps hand-off to the sink zero-copy.
//!
//! # Example
//!
//! ```
//! use udp_record_source::protocol::Record;
//!
//! let record = Record::from_slice(b"hello");
//! assert_eq!(record.as_bytes(), b"hello");
//! assert_eq!(record.len(), 5);
//! ```

use std::ops::Deref;

use bytes::Bytes;

/// One completed record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    body: Bytes,
}

impl Record {
    /// Wrap an existing `Bytes` body without copying.
    pub fn new(body: Bytes) -> Self {
        Self { body }
    }

    /// Create a record from a slice (copies data).
    pub fn from_slice(body: &[u8]) -> Self {
        Self {
            body: Bytes::copy_from_slice(body),
        }
    }

    /// Get a reference to the record body.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Consume the record and return its body.
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl Deref for Record {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.body
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.body
    }
}

impl From<Bytes> for Record {
    fn from(body: Bytes) -> Self {
        Self::new(body)
    }
}

impl From<&[u8]> for Record {
    fn from(body: &[u8]) -> Self {
        Self::from_slice(body)
    }
}

impl From<Record> for Bytes {
    fn from(record: Record) -> Self {
        record.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_copy() {
        let body = Bytes::from_static(b"static record");
        let record = Record::new(body.clone());

        assert_eq!(record.as_bytes().as_ptr(), body.as_ptr());
        assert_eq!(record.into_bytes().as_ptr(), body.as_ptr());
    }

    #[test]
    fn test_empty_record() {
        let record = Record::from_slice(b"");
        assert!(record.is_empty());
        assert_eq!(record.len(), 0);
    }

    #[test]
    fn test_deref_to_slice() {
        let record = Record::from_slice(b"abc");
        assert_eq!(&record[..2], b"ab");
        assert!(record.starts_with(b"a"));
    }

    #[test]
    fn test_binary_data_preserved() {
        let all_bytes: Vec<u8> = (0..=255).collect();
        let record = Record::from(&all_bytes[..]);
        assert_eq!(record.as_bytes(), &all_bytes[..]);
    }
}
