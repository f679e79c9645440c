//! Record slot format

use crate::error::{LinkvError, Result};

use super::{RecordOffset, TOMBSTONE_KEY};

/// Record header size: Key (4) + Next (8) = 12 bytes; the fixed-size value
/// payload follows immediately.
pub(super) const RECORD_HEADER_SIZE: u32 = 12;

/// A fixed-size record slot.
///
/// `next` links records belonging to the same logical bucket into an
/// intra-bucket chain; the chain continues into overflow buckets via the
/// bucket headers, not via `next`. The value payload is opaque bytes of
/// exactly the table's configured `value_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record key; [`TOMBSTONE_KEY`] marks an empty or deleted slot
    pub key: i32,

    /// Next record in this bucket's chain, or nil at the chain tail
    pub next: RecordOffset,

    /// Fixed-size opaque payload
    pub value: Vec<u8>,
}

impl Record {
    /// A blank (sentinel-key, zero-payload) slot.
    pub fn blank(value_size: u32) -> Self {
        Self {
            key: TOMBSTONE_KEY,
            next: RecordOffset::NIL,
            value: vec![0u8; value_size as usize],
        }
    }

    /// Total on-disk slot size for a given payload size.
    pub fn slot_size(value_size: u32) -> u32 {
        RECORD_HEADER_SIZE + value_size
    }

    /// Whether this slot is empty or tombstoned.
    pub fn is_tombstone(&self) -> bool {
        self.key == TOMBSTONE_KEY
    }

    /// Encode into the on-disk slot form.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RECORD_HEADER_SIZE as usize + self.value.len());
        buf.extend_from_slice(&self.key.to_le_bytes());
        buf.extend_from_slice(&self.next.raw().to_le_bytes());
        buf.extend_from_slice(&self.value);
        buf
    }

    /// Decode a slot of the given payload size.
    pub fn decode(buf: &[u8], value_size: u32) -> Result<Self> {
        let slot_size = Self::slot_size(value_size) as usize;
        if buf.len() < slot_size {
            return Err(LinkvError::Storage(format!(
                "record slot truncated: {} of {} bytes",
                buf.len(),
                slot_size
            )));
        }

        Ok(Self {
            key: i32::from_le_bytes(buf[0..4].try_into().unwrap()),
            next: RecordOffset::new(i64::from_le_bytes(buf[4..12].try_into().unwrap())),
            value: buf[12..slot_size].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips() {
        let record = Record {
            key: 42,
            next: RecordOffset::new(312),
            value: vec![0xAB; 16],
        };

        let decoded = Record::decode(&record.encode(), 16).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn blank_slot_is_tombstone() {
        let blank = Record::blank(8);
        assert!(blank.is_tombstone());
        assert!(blank.next.is_nil());
        assert_eq!(blank.value.len(), 8);
    }

    #[test]
    fn slot_size_includes_header() {
        assert_eq!(Record::slot_size(16), 28);
    }
}
