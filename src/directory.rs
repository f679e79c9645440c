//! Bucket directory
//!
//! The only indirection layer between logical bucket numbers and physical
//! storage: a growable array mapping logical bucket index → anchor bucket
//! offset in the data file.
//!
//! Directory entries always point at the *anchor* bucket; overflow buckets
//! are reachable only through each bucket header's `overflow_offset` chain.

use crate::storage::BucketOffset;

/// Growable logical-bucket-index → anchor-offset map.
///
/// Capacity doubles (repeatedly, if needed) when an index beyond the
/// current bounds is written. Entries are never compacted or removed;
/// unset slots report [`BucketOffset::NIL`].
#[derive(Debug, Clone)]
pub struct BucketDirectory {
    slots: Vec<BucketOffset>,
}

impl BucketDirectory {
    /// Create a directory with `capacity` unset slots.
    pub fn new(capacity: u32) -> Self {
        Self {
            slots: vec![BucketOffset::NIL; capacity.max(1) as usize],
        }
    }

    /// Rebuild a directory from persisted entries.
    pub fn from_entries(entries: Vec<BucketOffset>) -> Self {
        let mut slots = entries;
        if slots.is_empty() {
            slots.push(BucketOffset::NIL);
        }
        Self { slots }
    }

    /// Anchor offset for a logical bucket.
    ///
    /// Out-of-range indices report [`BucketOffset::NIL`], never an
    /// out-of-bounds access.
    pub fn get(&self, index: u32) -> BucketOffset {
        match self.slots.get(index as usize) {
            Some(offset) => *offset,
            None => BucketOffset::NIL,
        }
    }

    /// Record or overwrite the anchor offset for a logical bucket, growing
    /// the directory by doubling until the index fits. All prior entries
    /// are preserved across growth.
    pub fn set(&mut self, index: u32, offset: BucketOffset) {
        if index as usize >= self.slots.len() {
            let mut capacity = self.slots.len().max(1);
            while index as usize >= capacity {
                capacity *= 2;
            }
            tracing::debug!(
                old = self.slots.len(),
                new = capacity,
                "growing bucket directory"
            );
            self.slots.resize(capacity, BucketOffset::NIL);
        }

        self.slots[index as usize] = offset;
    }

    /// Current slot capacity (set and unset entries alike).
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// All entries, in index order, for persistence.
    pub fn entries(&self) -> &[BucketOffset] {
        &self.slots
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_out_of_range_report_nil() {
        let dir = BucketDirectory::new(4);
        assert!(dir.get(0).is_nil());
        assert!(dir.get(3).is_nil());
        assert!(dir.get(100).is_nil());
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut dir = BucketDirectory::new(4);
        dir.set(2, BucketOffset::new(96));
        assert_eq!(dir.get(2), BucketOffset::new(96));
    }

    #[test]
    fn growth_doubles_and_preserves_entries() {
        let mut dir = BucketDirectory::new(4);
        dir.set(0, BucketOffset::new(0));
        dir.set(3, BucketOffset::new(72));

        // Forces two doublings: 4 → 8 → 16.
        dir.set(9, BucketOffset::new(500));

        assert_eq!(dir.capacity(), 16);
        assert_eq!(dir.get(0), BucketOffset::new(0));
        assert_eq!(dir.get(3), BucketOffset::new(72));
        assert_eq!(dir.get(9), BucketOffset::new(500));
        assert!(dir.get(10).is_nil());
    }

    #[test]
    fn overwrite_replaces_entry() {
        let mut dir = BucketDirectory::new(2);
        dir.set(1, BucketOffset::new(24));
        dir.set(1, BucketOffset::new(48));
        assert_eq!(dir.get(1), BucketOffset::new(48));
    }
}
