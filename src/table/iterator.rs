//! Bucket iteration
//!
//! Lazy forward walk over one logical bucket's live records, following the
//! intra-bucket chain and crossing into overflow buckets as the chain
//! runs out. Tombstones are skipped; the sequence is finite and can be
//! restarted by re-issuing the iterator for the same index.

use crate::error::Result;
use crate::storage::{BucketOffset, Record, RecordOffset, RecordStore};

/// Iterator over a logical bucket's live records.
pub struct BucketIter<'a> {
    store: &'a RecordStore,

    /// Overflow link of the bucket currently being walked, nil at the end
    /// of the chain
    overflow_offset: BucketOffset,

    /// Next record slot to visit, nil when the current bucket is exhausted
    record_offset: RecordOffset,
}

impl<'a> BucketIter<'a> {
    pub(super) fn new(store: &'a RecordStore, anchor: BucketOffset) -> Result<Self> {
        let bucket = store.read_bucket(anchor)?;

        Ok(Self {
            store,
            overflow_offset: bucket.overflow_offset,
            record_offset: bucket.anchor_offset,
        })
    }

    fn step(&mut self) -> Result<Option<Record>> {
        loop {
            // Current bucket exhausted: move to the next overflow bucket,
            // if any.
            while self.record_offset.is_nil() {
                if self.overflow_offset.is_nil() {
                    return Ok(None);
                }

                let bucket = self.store.read_bucket(self.overflow_offset)?;
                self.overflow_offset = bucket.overflow_offset;
                self.record_offset = bucket.anchor_offset;
            }

            let record = self.store.read_record(self.record_offset)?;
            self.record_offset = record.next;

            if !record.is_tombstone() {
                return Ok(Some(record));
            }
        }
    }
}

impl Iterator for BucketIter<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}
