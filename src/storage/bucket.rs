//! Bucket header format

use crate::error::{LinkvError, Result};

use super::{BucketOffset, RecordOffset};

/// Bucket header size: Index (4) + RecordCount (4) + OverflowOffset (8) +
/// AnchorOffset (8) = 24 bytes
pub const BUCKET_HEADER_SIZE: u32 = 24;

/// A bucket header: fixed-size, immediately followed on disk by exactly
/// `records_per_bucket` record slots.
///
/// The same header shape serves anchor and overflow buckets; `index` is the
/// logical bucket number the physical bucket belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Logical bucket number this physical bucket serves
    pub index: u32,

    /// Number of live (non-sentinel) records in this bucket's slot region
    pub record_count: u32,

    /// Next bucket in this logical bucket's overflow chain, or nil
    pub overflow_offset: BucketOffset,

    /// First record slot that ever held a record for this bucket, or nil
    /// if the bucket has never held one
    pub anchor_offset: RecordOffset,
}

impl Bucket {
    /// A freshly allocated, empty bucket for a logical index.
    pub fn empty(index: u32) -> Self {
        Self {
            index,
            record_count: 0,
            overflow_offset: BucketOffset::NIL,
            anchor_offset: RecordOffset::NIL,
        }
    }

    /// Encode the header into its 24-byte on-disk form.
    pub fn encode(&self) -> [u8; BUCKET_HEADER_SIZE as usize] {
        let mut buf = [0u8; BUCKET_HEADER_SIZE as usize];
        buf[0..4].copy_from_slice(&self.index.to_le_bytes());
        buf[4..8].copy_from_slice(&self.record_count.to_le_bytes());
        buf[8..16].copy_from_slice(&self.overflow_offset.raw().to_le_bytes());
        buf[16..24].copy_from_slice(&self.anchor_offset.raw().to_le_bytes());
        buf
    }

    /// Decode a header from its on-disk form.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < BUCKET_HEADER_SIZE as usize {
            return Err(LinkvError::Storage(format!(
                "bucket header truncated: {} bytes",
                buf.len()
            )));
        }

        Ok(Self {
            index: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            record_count: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
            overflow_offset: BucketOffset::new(i64::from_le_bytes(
                buf[8..16].try_into().unwrap(),
            )),
            anchor_offset: RecordOffset::new(i64::from_le_bytes(
                buf[16..24].try_into().unwrap(),
            )),
        })
    }

    /// Whether the slot region is at full capacity.
    pub fn is_full(&self, records_per_bucket: u32) -> bool {
        self.record_count == records_per_bucket
    }
}
