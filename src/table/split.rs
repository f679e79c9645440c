//! Incremental split execution
//!
//! One split step relocates every live record of the bucket at the split
//! pointer (anchor and overflow chain alike) by tombstoning it where it
//! sits and reinserting it with the expanded hash. Reinserting through the
//! ordinary placement path reuses tombstone slots and allocates overflow
//! buckets exactly as normal insert traffic would: a split is a sequence of
//! ordinary delete+insert pairs, not a special-cased bulk copy.
//!
//! The fresh anchor bucket for the round's new logical index already
//! exists by the time redistribution runs; the trigger allocates it first.

use crate::error::Result;
use crate::router;

use super::{LinearHashTable, RecordHit};

/// A live record captured before redistribution begins.
struct Resident {
    hit: RecordHit,
    key: i32,
    value: Vec<u8>,
}

/// Redistribute the bucket at the table's split pointer.
///
/// Records whose expanded hash still maps to the split bucket land back in
/// its chain (typically reusing their own tombstone); the rest move to the
/// round's new bucket. The table's record count is unchanged: every
/// tombstone is paired with a reinsert.
pub(super) fn redistribute(table: &mut LinearHashTable) -> Result<()> {
    let target = table.state.split_pointer;
    tracing::debug!(bucket = target, "splitting bucket");

    // Capture the chain's live records up front so redistribution can
    // mutate the same chain safely.
    let residents = collect_live(table, target)?;

    let mut moved = 0;
    for resident in residents {
        let destination = router::post_split_bucket(resident.key, table.state.base_size);

        table.tombstone(&resident.hit)?;
        table.place_record(resident.key, &resident.value, destination)?;

        if destination != target {
            moved += 1;
        }
    }

    tracing::debug!(bucket = target, moved, "split complete");
    Ok(())
}

/// Walk the target bucket's full chain and collect every live record.
fn collect_live(table: &LinearHashTable, bucket_index: u32) -> Result<Vec<Resident>> {
    let mut residents = Vec::new();
    let mut bucket_offset = table.directory.get(bucket_index);

    while !bucket_offset.is_nil() {
        let bucket = table.store.read_bucket(bucket_offset)?;
        let mut record_offset = bucket.anchor_offset;

        while !record_offset.is_nil() {
            let record = table.store.read_record(record_offset)?;

            if !record.is_tombstone() {
                residents.push(Resident {
                    hit: RecordHit {
                        bucket_offset,
                        record_offset,
                        record: record.clone(),
                    },
                    key: record.key,
                    value: record.value.clone(),
                });
            }

            record_offset = record.next;
        }

        bucket_offset = bucket.overflow_offset;
    }

    Ok(residents)
}
