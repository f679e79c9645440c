//! Tests for the raw bucket/record store
//!
//! These tests verify:
//! - Bucket append layout (header + blank slot region, at end of file)
//! - Positioned bucket and record read/write round-trips
//! - Nil-offset and payload-size guards

use linkv::storage::{Bucket, BucketOffset, Record, RecordOffset, RecordStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const RECORDS_PER_BUCKET: u32 = 4;
const VALUE_SIZE: u32 = 8;

fn setup_store() -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::create(
        &temp_dir.path().join("data.bin"),
        RECORDS_PER_BUCKET,
        VALUE_SIZE,
    )
    .unwrap();
    (temp_dir, store)
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_first_bucket_lands_at_offset_zero() {
    let (_temp, store) = setup_store();

    let offset = store.append_bucket(0).unwrap();
    assert_eq!(offset, BucketOffset::new(0));
}

#[test]
fn test_buckets_append_end_to_end() {
    let (_temp, store) = setup_store();

    let first = store.append_bucket(0).unwrap();
    let second = store.append_bucket(1).unwrap();

    assert_eq!(
        second.raw() - first.raw(),
        store.bucket_size() as i64,
        "buckets must be contiguous"
    );
}

#[test]
fn test_appended_bucket_is_empty() {
    let (_temp, store) = setup_store();

    let offset = store.append_bucket(3).unwrap();
    let bucket = store.read_bucket(offset).unwrap();

    assert_eq!(bucket.index, 3);
    assert_eq!(bucket.record_count, 0);
    assert!(bucket.overflow_offset.is_nil());
    assert!(bucket.anchor_offset.is_nil());
}

#[test]
fn test_appended_slot_region_is_blank() {
    let (_temp, store) = setup_store();

    let offset = store.append_bucket(0).unwrap();

    let mut slot = offset.slots_start();
    for _ in 0..RECORDS_PER_BUCKET {
        let record = store.read_record(slot).unwrap();
        assert!(record.is_tombstone());
        assert!(record.next.is_nil());
        slot = slot.advance(1, store.slot_size());
    }
}

// =============================================================================
// Read/Write Tests
// =============================================================================

#[test]
fn test_bucket_header_write_read_round_trip() {
    let (_temp, store) = setup_store();

    let offset = store.append_bucket(0).unwrap();
    let mut bucket = store.read_bucket(offset).unwrap();
    bucket.record_count = 2;
    bucket.anchor_offset = offset.slots_start();

    store.write_bucket(offset, &bucket).unwrap();

    assert_eq!(store.read_bucket(offset).unwrap(), bucket);
}

#[test]
fn test_record_write_read_round_trip() {
    let (_temp, store) = setup_store();

    let offset = store.append_bucket(0).unwrap();
    let slot = offset.slots_start().advance(2, store.slot_size());

    let record = Record {
        key: 42,
        next: RecordOffset::new(999),
        value: vec![0xCD; VALUE_SIZE as usize],
    };
    store.write_record(slot, &record).unwrap();

    assert_eq!(store.read_record(slot).unwrap(), record);
}

#[test]
fn test_record_write_leaves_neighbors_untouched() {
    let (_temp, store) = setup_store();

    let offset = store.append_bucket(0).unwrap();
    let slot1 = offset.slots_start().advance(1, store.slot_size());

    let record = Record {
        key: 7,
        next: RecordOffset::NIL,
        value: vec![0xFF; VALUE_SIZE as usize],
    };
    store.write_record(slot1, &record).unwrap();

    let slot0 = offset.slots_start();
    let slot2 = offset.slots_start().advance(2, store.slot_size());
    assert!(store.read_record(slot0).unwrap().is_tombstone());
    assert!(store.read_record(slot2).unwrap().is_tombstone());
}

// =============================================================================
// Guard Tests
// =============================================================================

#[test]
fn test_nil_offset_io_is_an_error() {
    let (_temp, store) = setup_store();
    store.append_bucket(0).unwrap();

    assert!(store.read_bucket(BucketOffset::NIL).is_err());
    assert!(store.read_record(RecordOffset::NIL).is_err());
    assert!(store
        .write_bucket(BucketOffset::NIL, &Bucket::empty(0))
        .is_err());
}

#[test]
fn test_oversized_payload_is_rejected() {
    let (_temp, store) = setup_store();

    let offset = store.append_bucket(0).unwrap();
    let record = Record {
        key: 1,
        next: RecordOffset::NIL,
        value: vec![0u8; VALUE_SIZE as usize + 4],
    };

    assert!(store.write_record(offset.slots_start(), &record).is_err());
}

#[test]
fn test_open_missing_data_file_fails() {
    let temp = TempDir::new().unwrap();

    let result = RecordStore::open(
        &temp.path().join("missing.bin"),
        RECORDS_PER_BUCKET,
        VALUE_SIZE,
    );
    assert!(result.is_err());
}
