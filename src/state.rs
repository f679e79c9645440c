//! State persistence
//!
//! Snapshots the table's scalar state and the bucket directory to a small
//! side file, so the table survives process restarts. Re-opening restores
//! this state before any operation is accepted.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Header (10 bytes)                                        │
//! │   Magic: "LHST" (4) | Version: u16 (2) | CRC32: u32 (4)  │
//! ├──────────────────────────────────────────────────────────┤
//! │ Scalar snapshot (36 bytes, bincode fixint)               │
//! ├──────────────────────────────────────────────────────────┤
//! │ Directory entries (directory_len × i64 anchor offsets)   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The CRC covers snapshot + directory. Each structural mutation persists
//! eagerly by rewriting the whole file; the snapshot is a few dozen bytes
//! plus eight bytes per logical bucket.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::directory::BucketDirectory;
use crate::error::{LinkvError, Result};
use crate::storage::BucketOffset;

/// Magic bytes identifying a LinKV state file
const MAGIC: &[u8; 4] = b"LHST";

/// Current state file format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + CRC32 (4) = 10 bytes
const HEADER_SIZE: usize = 10;

/// Fixed snapshot size: 6 × u32 + 1 × u64 + directory_len u32 = 36 bytes
/// (bincode's default fixint encoding, so the directory always lands at the
/// same offset)
const SNAPSHOT_SIZE: usize = 36;

/// The table's scalar state, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    /// Initial bucket count for the current round; doubles per round
    pub base_size: u32,

    /// Total logical buckets allocated (anchors only)
    pub bucket_count: u32,

    /// Total live records across the table
    pub record_count: u64,

    /// Next logical bucket due to split
    pub split_pointer: u32,

    /// Load-factor percentage that triggers a split
    pub split_threshold: u32,

    /// Slot capacity of every bucket
    pub records_per_bucket: u32,

    /// Fixed value payload size
    pub value_size: u32,

    /// Number of directory entries that follow the snapshot
    pub directory_len: u32,
}

/// Persists and restores [`TableState`] plus the bucket directory.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Write a full snapshot, replacing any previous one.
    pub fn save(&self, state: &TableState, directory: &BucketDirectory) -> Result<()> {
        let mut state = state.clone();
        state.directory_len = directory.capacity();

        let snapshot = bincode::serialize(&state)
            .map_err(|e| LinkvError::Storage(format!("state serialization failed: {}", e)))?;
        debug_assert_eq!(snapshot.len(), SNAPSHOT_SIZE);

        let mut body = snapshot;
        for entry in directory.entries() {
            body.extend_from_slice(&entry.raw().to_le_bytes());
        }

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&body);
        let crc = hasher.finalize();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        file.write_all(MAGIC)?;
        file.write_all(&VERSION.to_le_bytes())?;
        file.write_all(&crc.to_le_bytes())?;
        file.write_all(&body)?;

        tracing::debug!(
            bucket_count = state.bucket_count,
            record_count = state.record_count,
            split_pointer = state.split_pointer,
            "persisted table state"
        );
        Ok(())
    }

    /// Read back the snapshot and rebuild the directory.
    pub fn load(&self) -> Result<(TableState, BucketDirectory)> {
        let mut file = OpenOptions::new().read(true).open(&self.path)?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        if data.len() < HEADER_SIZE + SNAPSHOT_SIZE {
            return Err(LinkvError::StateCorruption(format!(
                "state file truncated: {} bytes",
                data.len()
            )));
        }

        if &data[0..4] != MAGIC {
            return Err(LinkvError::StateCorruption(format!(
                "invalid magic: expected LHST, got {:?}",
                &data[0..4]
            )));
        }

        let version = u16::from_le_bytes(data[4..6].try_into().unwrap());
        if version != VERSION {
            return Err(LinkvError::StateCorruption(format!(
                "unsupported state file version: {}",
                version
            )));
        }

        let stored_crc = u32::from_le_bytes(data[6..10].try_into().unwrap());
        let body = &data[HEADER_SIZE..];

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(body);
        if hasher.finalize() != stored_crc {
            return Err(LinkvError::StateCorruption(
                "checksum mismatch".to_string(),
            ));
        }

        let state: TableState = bincode::deserialize(&body[..SNAPSHOT_SIZE])
            .map_err(|e| LinkvError::Storage(format!("state deserialization failed: {}", e)))?;

        let dir_bytes = &body[SNAPSHOT_SIZE..];
        if dir_bytes.len() < state.directory_len as usize * 8 {
            return Err(LinkvError::StateCorruption(format!(
                "directory truncated: {} entries expected",
                state.directory_len
            )));
        }

        let mut entries = Vec::with_capacity(state.directory_len as usize);
        for i in 0..state.directory_len as usize {
            let raw = i64::from_le_bytes(dir_bytes[i * 8..i * 8 + 8].try_into().unwrap());
            entries.push(BucketOffset::new(raw));
        }

        Ok((state, BucketDirectory::from_entries(entries)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_state() -> TableState {
        TableState {
            base_size: 4,
            bucket_count: 6,
            record_count: 17,
            split_pointer: 2,
            split_threshold: 85,
            records_per_bucket: 4,
            value_size: 16,
            directory_len: 0,
        }
    }

    #[test]
    fn snapshot_has_fixed_size() {
        let encoded = bincode::serialize(&sample_state()).unwrap();
        assert_eq!(encoded.len(), SNAPSHOT_SIZE);
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(&temp.path().join("state.bin"));

        let mut dir = BucketDirectory::new(4);
        dir.set(0, BucketOffset::new(0));
        dir.set(5, BucketOffset::new(720));

        store.save(&sample_state(), &dir).unwrap();
        let (state, loaded) = store.load().unwrap();

        assert_eq!(state.bucket_count, 6);
        assert_eq!(state.record_count, 17);
        assert_eq!(state.directory_len, dir.capacity());
        assert_eq!(loaded.get(0), BucketOffset::new(0));
        assert_eq!(loaded.get(5), BucketOffset::new(720));
        assert!(loaded.get(3).is_nil());
    }

    #[test]
    fn corrupted_body_fails_checksum() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.bin");
        let store = StateStore::new(&path);

        store.save(&sample_state(), &BucketDirectory::new(4)).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            store.load(),
            Err(LinkvError::StateCorruption(_))
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.bin");

        std::fs::write(&path, vec![0u8; 64]).unwrap();
        assert!(matches!(
            StateStore::new(&path).load(),
            Err(LinkvError::StateCorruption(_))
        ));
    }
}
