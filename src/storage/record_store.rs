//! Raw bucket/record I/O
//!
//! Positioned reads and writes over the single data file. Every call uses
//! pread/pwrite-style primitives (`FileExt`), so the file's logical cursor
//! is never moved and callers can never observe an inconsistent position;
//! there is no save/seek/restore dance to get wrong.
//!
//! Appending a bucket is the only allocation primitive; there is no
//! free-list and no slot reuse across buckets. A write is assumed atomic at
//! slot/header granularity; no partial-write recovery is attempted.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::Path;

use crate::error::{LinkvError, Result};

use super::{Bucket, BucketOffset, Record, RecordOffset, BUCKET_HEADER_SIZE};

/// Fixed-geometry bucket/record I/O over one data file.
pub struct RecordStore {
    /// Backing data file; accessed only through positioned I/O
    file: File,

    /// Slot capacity of every bucket
    records_per_bucket: u32,

    /// Fixed value payload size
    value_size: u32,
}

impl RecordStore {
    /// Create a fresh data file, truncating any previous contents.
    pub fn create(path: &Path, records_per_bucket: u32, value_size: u32) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            file,
            records_per_bucket,
            value_size,
        })
    }

    /// Open an existing data file.
    ///
    /// An unopenable backing store is fatal; the table cannot proceed
    /// without it.
    pub fn open(path: &Path, records_per_bucket: u32, value_size: u32) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        Ok(Self {
            file,
            records_per_bucket,
            value_size,
        })
    }

    /// On-disk size of one record slot.
    pub fn slot_size(&self) -> u32 {
        Record::slot_size(self.value_size)
    }

    /// On-disk size of one bucket (header plus full slot region).
    pub fn bucket_size(&self) -> u32 {
        BUCKET_HEADER_SIZE + self.records_per_bucket * self.slot_size()
    }

    pub fn records_per_bucket(&self) -> u32 {
        self.records_per_bucket
    }

    pub fn value_size(&self) -> u32 {
        self.value_size
    }

    // =========================================================================
    // Bucket I/O
    // =========================================================================

    /// Read the bucket header at `offset`.
    pub fn read_bucket(&self, offset: BucketOffset) -> Result<Bucket> {
        if offset.is_nil() {
            return Err(LinkvError::Storage(
                "attempted to read a bucket at the nil offset".to_string(),
            ));
        }

        let mut buf = [0u8; BUCKET_HEADER_SIZE as usize];
        self.file.read_exact_at(&mut buf, offset.raw() as u64)?;
        Bucket::decode(&buf)
    }

    /// Write the bucket header at `offset`.
    pub fn write_bucket(&self, offset: BucketOffset, bucket: &Bucket) -> Result<()> {
        if offset.is_nil() {
            return Err(LinkvError::Storage(
                "attempted to write a bucket at the nil offset".to_string(),
            ));
        }

        self.file.write_all_at(&bucket.encode(), offset.raw() as u64)?;
        Ok(())
    }

    /// Append a fresh, empty bucket for logical index `index` at the true
    /// end of the file: header first, then `records_per_bucket` blank
    /// (sentinel-key) slots. Returns the offset written.
    pub fn append_bucket(&self, index: u32) -> Result<BucketOffset> {
        let end = self.file.metadata()?.len();

        let bucket = Bucket::empty(index);
        let blank = Record::blank(self.value_size).encode();

        let mut buf = Vec::with_capacity(self.bucket_size() as usize);
        buf.extend_from_slice(&bucket.encode());
        for _ in 0..self.records_per_bucket {
            buf.extend_from_slice(&blank);
        }

        self.file.write_all_at(&buf, end)?;

        tracing::debug!(index, offset = end, "appended bucket");
        Ok(BucketOffset::new(end as i64))
    }

    // =========================================================================
    // Record I/O
    // =========================================================================

    /// Read the record slot at `offset`.
    pub fn read_record(&self, offset: RecordOffset) -> Result<Record> {
        if offset.is_nil() {
            return Err(LinkvError::Storage(
                "attempted to read a record at the nil offset".to_string(),
            ));
        }

        let mut buf = vec![0u8; self.slot_size() as usize];
        self.file.read_exact_at(&mut buf, offset.raw() as u64)?;
        Record::decode(&buf, self.value_size)
    }

    /// Write the record slot at `offset`.
    ///
    /// The record's payload must be exactly the table's value size.
    pub fn write_record(&self, offset: RecordOffset, record: &Record) -> Result<()> {
        if offset.is_nil() {
            return Err(LinkvError::Storage(
                "attempted to write a record at the nil offset".to_string(),
            ));
        }
        if record.value.len() != self.value_size as usize {
            return Err(LinkvError::Storage(format!(
                "record payload is {} bytes, table value size is {}",
                record.value.len(),
                self.value_size
            )));
        }

        self.file.write_all_at(&record.encode(), offset.raw() as u64)?;
        Ok(())
    }
}
