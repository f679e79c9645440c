//! Linear Hash Table
//!
//! The core engine: owns the table-wide scalar state and composes the
//! bucket directory, record store, and hash router into insert, point
//! lookup, delete, and update.
//!
//! ## Growth model
//!
//! The table never rehashes wholesale. Each insert that pushes the load
//! factor past the threshold triggers exactly **one** incremental split
//! step: a fresh anchor bucket is allocated for logical index
//! `bucket_count`, and the bucket at `split_pointer` is redistributed with
//! the expanded hash. When the split pointer sweeps past every bucket of
//! the round, `base_size` doubles and the pointer resets to 0.
//!
//! ## Routing contract
//!
//! `get`/`delete`/`update` always resolve a key's bucket themselves via the
//! routing rule. `insert` deliberately takes a pre-resolved target bucket:
//! its callers (`put` and the split engine) control which hash generation
//! places the record.

mod iterator;
mod split;

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::directory::BucketDirectory;
use crate::error::{LinkvError, Result};
use crate::router;
use crate::state::{StateStore, TableState};
use crate::storage::{Bucket, BucketOffset, Record, RecordOffset, RecordStore};

pub use iterator::BucketIter;

/// A record's location: the physical bucket whose slot region holds it,
/// plus the slot itself.
struct RecordHit {
    bucket_offset: BucketOffset,
    record_offset: RecordOffset,
    record: Record,
}

/// The disk-resident linear hash table.
///
/// Single-threaded and synchronous; the engine as a whole is one critical
/// section. A concurrent port must add external mutual exclusion around
/// every operation.
pub struct LinearHashTable {
    /// Scalar state, persisted after every structural change
    state: TableState,

    /// Logical bucket index → anchor bucket offset
    directory: BucketDirectory,

    /// Raw bucket/record I/O over the data file
    store: RecordStore,

    /// Snapshot persistence for `state` + `directory`
    state_store: StateStore,
}

impl LinearHashTable {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DATA_FILENAME: &'static str = "data.bin";
    const STATE_FILENAME: &'static str = "state.bin";

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Initialize a new table.
    ///
    /// Validates the config, creates the data file, allocates `base_size`
    /// empty anchor buckets, and persists the initial state. Any previous
    /// table in the same directory is replaced.
    pub fn create(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let store = RecordStore::create(
            &config.data_dir.join(Self::DATA_FILENAME),
            config.records_per_bucket,
            config.value_size,
        )?;

        let mut directory = BucketDirectory::new(config.base_size);
        for index in 0..config.base_size {
            let offset = store.append_bucket(index)?;
            directory.set(index, offset);
        }

        let state = TableState {
            base_size: config.base_size,
            bucket_count: config.base_size,
            record_count: 0,
            split_pointer: 0,
            split_threshold: config.split_threshold,
            records_per_bucket: config.records_per_bucket,
            value_size: config.value_size,
            directory_len: directory.capacity(),
        };

        let state_store = StateStore::new(&config.data_dir.join(Self::STATE_FILENAME));
        state_store.save(&state, &directory)?;

        tracing::debug!(
            base_size = state.base_size,
            records_per_bucket = state.records_per_bucket,
            value_size = state.value_size,
            "initialized linear hash table"
        );

        Ok(Self {
            state,
            directory,
            store,
            state_store,
        })
    }

    /// Re-open a previously created table.
    ///
    /// Restores the persisted scalar state and directory before any
    /// operation is accepted; the table's geometry comes from the snapshot,
    /// not from config.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let state_store = StateStore::new(&data_dir.join(Self::STATE_FILENAME));
        let (state, directory) = state_store.load()?;

        let store = RecordStore::open(
            &data_dir.join(Self::DATA_FILENAME),
            state.records_per_bucket,
            state.value_size,
        )?;

        tracing::debug!(
            bucket_count = state.bucket_count,
            record_count = state.record_count,
            "re-opened linear hash table"
        );

        Ok(Self {
            state,
            directory,
            store,
            state_store,
        })
    }

    // =========================================================================
    // Public Operations
    // =========================================================================

    /// Insert a key-value pair, resolving the target bucket through the
    /// routing rule. Returns the number of records affected (1).
    pub fn put(&mut self, key: i32, value: &[u8]) -> Result<usize> {
        self.check_key(key)?;
        self.check_value(value)?;

        let target =
            router::current_bucket(key, self.state.base_size, self.state.split_pointer);
        self.insert(key, value, target)
    }

    /// Insert a key-value pair into an already-resolved target bucket.
    ///
    /// Steps:
    /// 1. Place the record (empty bucket / tombstone reuse / append at
    ///    chain tail / new overflow bucket)
    /// 2. Increment the table's record count and persist state
    /// 3. If the load factor now exceeds the threshold, run exactly one
    ///    split step
    pub fn insert(&mut self, key: i32, value: &[u8], target_bucket: u32) -> Result<usize> {
        self.check_key(key)?;
        self.check_value(value)?;

        self.place_record(key, value, target_bucket)?;
        self.state.record_count += 1;

        if self.load_factor() > self.state.split_threshold {
            self.split()?;
        } else {
            self.persist()?;
        }

        tracing::trace!(key, target_bucket, "inserted record");
        Ok(1)
    }

    /// Look up a key. Returns `Ok(None)` when the key is absent.
    pub fn get(&self, key: i32) -> Result<Option<Vec<u8>>> {
        let bucket_index =
            router::current_bucket(key, self.state.base_size, self.state.split_pointer);

        match self.find_record(key, bucket_index)? {
            Some(hit) => Ok(Some(hit.record.value)),
            None => Ok(None),
        }
    }

    /// Delete a key: the first matching slot is tombstoned in place, its
    /// chain link left intact so later slots stay reachable. Returns the
    /// number of records affected (0 when the key is absent).
    pub fn delete(&mut self, key: i32) -> Result<usize> {
        let bucket_index =
            router::current_bucket(key, self.state.base_size, self.state.split_pointer);

        let hit = match self.find_record(key, bucket_index)? {
            Some(hit) => hit,
            None => return Ok(0),
        };

        self.tombstone(&hit)?;
        self.state.record_count -= 1;
        self.persist()?;

        tracing::trace!(key, bucket_index, "deleted record");
        Ok(1)
    }

    /// Overwrite the payload of every live record with this key, in place.
    /// Returns the count of slots updated; more than one only if a
    /// higher-level write policy permitted duplicate keys.
    pub fn update(&mut self, key: i32, value: &[u8]) -> Result<usize> {
        self.check_key(key)?;
        self.check_value(value)?;

        let bucket_index =
            router::current_bucket(key, self.state.base_size, self.state.split_pointer);

        let mut updated = 0;
        let mut bucket_offset = self.directory.get(bucket_index);

        while !bucket_offset.is_nil() {
            let bucket = self.store.read_bucket(bucket_offset)?;
            let mut record_offset = bucket.anchor_offset;

            while !record_offset.is_nil() {
                let mut record = self.store.read_record(record_offset)?;

                if !record.is_tombstone() && record.key == key {
                    record.value = value.to_vec();
                    self.store.write_record(record_offset, &record)?;
                    updated += 1;
                }

                record_offset = record.next;
            }

            bucket_offset = bucket.overflow_offset;
        }

        tracing::trace!(key, updated, "updated records");
        Ok(updated)
    }

    /// Lazy forward iterator over one logical bucket's live records,
    /// walking the full overflow chain. Restartable by re-issuing with the
    /// same index.
    pub fn iter_bucket(&self, bucket_index: u32) -> Result<BucketIter<'_>> {
        if bucket_index >= self.state.bucket_count {
            return Err(LinkvError::Storage(format!(
                "bucket {} out of range ({} allocated)",
                bucket_index, self.state.bucket_count
            )));
        }

        BucketIter::new(&self.store, self.directory.get(bucket_index))
    }

    /// Execute one incremental split step.
    ///
    /// Allocates the fresh anchor bucket for logical index `bucket_count`,
    /// redistributes the bucket at `split_pointer` with the expanded hash,
    /// advances the pointer (doubling `base_size` when the round
    /// completes), and persists.
    pub fn split(&mut self) -> Result<()> {
        let new_index = self.state.bucket_count;
        let offset = self.store.append_bucket(new_index)?;
        self.directory.set(new_index, offset);
        self.state.bucket_count += 1;

        split::redistribute(self)?;

        self.state.split_pointer += 1;
        if self.state.split_pointer == self.state.base_size {
            self.state.split_pointer = 0;
            self.state.base_size *= 2;
            tracing::debug!(base_size = self.state.base_size, "split round complete");
        }

        self.persist()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Integer load percentage: `100 * record_count` over total anchor slot
    /// capacity.
    pub fn load_factor(&self) -> u32 {
        let capacity =
            self.state.bucket_count as u64 * self.state.records_per_bucket as u64;
        (100 * self.state.record_count / capacity) as u32
    }

    /// Total live records across the table
    pub fn record_count(&self) -> u64 {
        self.state.record_count
    }

    /// Total logical buckets allocated (anchors only)
    pub fn bucket_count(&self) -> u32 {
        self.state.bucket_count
    }

    /// Next logical bucket due to split
    pub fn split_pointer(&self) -> u32 {
        self.state.split_pointer
    }

    /// Initial bucket count for the current round
    pub fn base_size(&self) -> u32 {
        self.state.base_size
    }

    /// Fixed value payload size
    pub fn value_size(&self) -> u32 {
        self.store.value_size()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_key(&self, key: i32) -> Result<()> {
        if key < 0 {
            return Err(LinkvError::InvalidKey(key));
        }
        Ok(())
    }

    fn check_value(&self, value: &[u8]) -> Result<()> {
        if value.len() != self.store.value_size() as usize {
            return Err(LinkvError::ValueSize {
                got: value.len(),
                expected: self.store.value_size(),
            });
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        self.state_store.save(&self.state, &self.directory)
    }

    /// Place a record into a target bucket's chain. Updates bucket headers
    /// and the directory but not the table's record count; `insert` and the
    /// split engine own that.
    ///
    /// Placement order:
    /// 1. Reuse the first tombstoned slot reachable through the chain
    /// 2. Otherwise append after the chain tail of the last bucket
    /// 3. If the last bucket is full, link a new overflow bucket and place
    ///    the record as its anchor
    fn place_record(&mut self, key: i32, value: &[u8], target_bucket: u32) -> Result<()> {
        let anchor_offset = self.directory.get(target_bucket);
        if anchor_offset.is_nil() {
            return Err(LinkvError::Storage(format!(
                "no anchor bucket for logical index {}",
                target_bucket
            )));
        }

        // Scan the chain for a tombstone, remembering the last bucket so an
        // append has somewhere to go. Only slots reachable through chain
        // links are candidates: a blank slot past the chain tail has
        // nothing pointing at it, and writing there would orphan the
        // record.
        let mut bucket_offset = anchor_offset;
        let mut bucket = self.store.read_bucket(bucket_offset)?;

        loop {
            let mut record_offset = bucket.anchor_offset;
            while !record_offset.is_nil() {
                let record = self.store.read_record(record_offset)?;

                if record.is_tombstone() {
                    // Reuse in place, preserving the chain link.
                    let replacement = Record {
                        key,
                        next: record.next,
                        value: value.to_vec(),
                    };
                    self.store.write_record(record_offset, &replacement)?;

                    bucket.record_count += 1;
                    self.store.write_bucket(bucket_offset, &bucket)?;

                    tracing::trace!(key, offset = record_offset.raw(), "reused tombstone");
                    return Ok(());
                }

                record_offset = record.next;
            }

            if bucket.overflow_offset.is_nil() {
                break;
            }
            bucket_offset = bucket.overflow_offset;
            bucket = self.store.read_bucket(bucket_offset)?;
        }

        // No tombstone anywhere in the chain: the last bucket's occupied
        // slots form a contiguous prefix, so the tail sits at
        // record_count - 1 and the next free slot at record_count.
        if bucket.anchor_offset.is_nil() {
            // Bucket has never held a record.
            let record_offset = bucket_offset.slots_start();
            let record = Record {
                key,
                next: RecordOffset::NIL,
                value: value.to_vec(),
            };
            self.store.write_record(record_offset, &record)?;

            bucket.anchor_offset = record_offset;
            bucket.record_count += 1;
            self.store.write_bucket(bucket_offset, &bucket)?;
            return Ok(());
        }

        if !bucket.is_full(self.store.records_per_bucket()) {
            let slot_size = self.store.slot_size();
            let tail_offset = bucket
                .anchor_offset
                .advance(bucket.record_count - 1, slot_size);
            let record_offset = bucket.anchor_offset.advance(bucket.record_count, slot_size);

            let mut tail = self.store.read_record(tail_offset)?;
            tail.next = record_offset;
            self.store.write_record(tail_offset, &tail)?;

            let record = Record {
                key,
                next: RecordOffset::NIL,
                value: value.to_vec(),
            };
            self.store.write_record(record_offset, &record)?;

            bucket.record_count += 1;
            self.store.write_bucket(bucket_offset, &bucket)?;
            return Ok(());
        }

        // Chain tail bucket is full: link a fresh overflow bucket. The
        // directory entry is untouched; overflow buckets are reachable
        // only through the overflow chain.
        let overflow_offset = self.store.append_bucket(bucket.index)?;
        bucket.overflow_offset = overflow_offset;
        self.store.write_bucket(bucket_offset, &bucket)?;

        let record_offset = overflow_offset.slots_start();
        let record = Record {
            key,
            next: RecordOffset::NIL,
            value: value.to_vec(),
        };
        self.store.write_record(record_offset, &record)?;

        let mut overflow = Bucket::empty(bucket.index);
        overflow.anchor_offset = record_offset;
        overflow.record_count = 1;
        self.store.write_bucket(overflow_offset, &overflow)?;

        tracing::debug!(
            bucket = target_bucket,
            offset = overflow_offset.raw(),
            "created overflow bucket"
        );
        Ok(())
    }

    /// Exhaustive chain walk for a key's first live match. Tombstones never
    /// match and never stop the scan; only chain exhaustion does.
    fn find_record(&self, key: i32, bucket_index: u32) -> Result<Option<RecordHit>> {
        let mut bucket_offset = self.directory.get(bucket_index);

        while !bucket_offset.is_nil() {
            let bucket = self.store.read_bucket(bucket_offset)?;
            let mut record_offset = bucket.anchor_offset;

            while !record_offset.is_nil() {
                let record = self.store.read_record(record_offset)?;

                if !record.is_tombstone() && record.key == key {
                    return Ok(Some(RecordHit {
                        bucket_offset,
                        record_offset,
                        record,
                    }));
                }

                record_offset = record.next;
            }

            bucket_offset = bucket.overflow_offset;
        }

        Ok(None)
    }

    /// Tombstone a located record in place and decrement its bucket's
    /// count. The slot's chain link is preserved.
    fn tombstone(&mut self, hit: &RecordHit) -> Result<()> {
        let mut record = hit.record.clone();
        record.key = crate::storage::TOMBSTONE_KEY;
        self.store.write_record(hit.record_offset, &record)?;

        let mut bucket = self.store.read_bucket(hit.bucket_offset)?;
        bucket.record_count -= 1;
        self.store.write_bucket(hit.bucket_offset, &bucket)?;
        Ok(())
    }
}
