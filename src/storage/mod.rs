//! Storage Module
//!
//! On-disk format and raw I/O for the linear hash table's single data file.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Bucket (header, 24 bytes)                                    │
//! │   Index: u32 | RecordCount: u32                              │
//! │   OverflowOffset: i64 | AnchorOffset: i64                    │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Record slots (records_per_bucket × slot)                     │
//! │   [Key: i32][Next: i64][Value: value_size bytes]             │
//! ├──────────────────────────────────────────────────────────────┤
//! │ ... next bucket (anchor or overflow), appended at EOF ...    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logical bucket 0's anchor sits at offset 0; every later anchor and every
//! overflow bucket is appended at the current end of file. Offsets are
//! opaque typed handles so bucket offsets and record offsets cannot be
//! mixed up; `-1` is the nil sentinel for both. A record whose key is the
//! sentinel `-1` is an empty slot or a tombstone: the format does not
//! distinguish "never written" from "deleted".
//!
//! The header's `index` and `record_count` are encoded as unsigned 32-bit
//! integers. Both are non-negative by construction, so the little-endian
//! bytes are identical to a signed 32-bit encoding of the same values.

mod bucket;
mod record;
mod record_store;

pub use bucket::{Bucket, BUCKET_HEADER_SIZE};
pub use record::Record;
pub use record_store::RecordStore;

// =============================================================================
// Shared Constants
// =============================================================================

/// Sentinel key marking an empty or tombstoned record slot
pub const TOMBSTONE_KEY: i32 = -1;

/// Sentinel byte offset meaning "no such location" (end of chain, no
/// overflow bucket, unset directory entry)
pub const NIL_OFFSET: i64 = -1;

// =============================================================================
// Typed Offsets
// =============================================================================

/// Byte offset of a bucket header in the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketOffset(i64);

/// Byte offset of a record slot in the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOffset(i64);

impl BucketOffset {
    /// The nil bucket offset
    pub const NIL: Self = Self(NIL_OFFSET);

    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    pub fn is_nil(self) -> bool {
        self.0 == NIL_OFFSET
    }

    /// Offset of the first record slot in this bucket's slot region
    pub fn slots_start(self) -> RecordOffset {
        RecordOffset(self.0 + BUCKET_HEADER_SIZE as i64)
    }
}

impl RecordOffset {
    /// The nil record offset (chain terminator)
    pub const NIL: Self = Self(NIL_OFFSET);

    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    pub fn is_nil(self) -> bool {
        self.0 == NIL_OFFSET
    }

    /// Offset `slots` record slots further along the slot region
    pub fn advance(self, slots: u32, slot_size: u32) -> Self {
        Self(self.0 + slots as i64 * slot_size as i64)
    }
}
