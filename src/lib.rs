//! # LinKV
//!
//! An embedded, disk-resident **linear hash table**:
//! - Incremental growth (one bucket split per trigger, no full rehash)
//! - Fixed-size records with intra-bucket chains and overflow buckets
//! - Single data file plus a small persisted state snapshot
//! - Single-threaded, synchronous, positioned I/O
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LinearHashTable                           │
//! │        (insert / get / delete / update / iterate)            │
//! └───────┬──────────────────┬──────────────────┬───────────────┘
//!         │                  │                  │
//!         ▼                  ▼                  ▼
//!  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!  │ HashRouter  │    │ BucketDir   │    │ SplitEngine │
//!  │ (key→index) │    │ (index→off) │    │ (one step)  │
//!  └─────────────┘    └──────┬──────┘    └──────┬──────┘
//!                            │                  │
//!                            ▼                  ▼
//!                     ┌─────────────────────────────┐
//!                     │        RecordStore          │
//!                     │  (positioned bucket/record  │
//!                     │       I/O over one file)    │
//!                     └─────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod directory;
pub mod router;
pub mod storage;
pub mod state;
pub mod table;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LinkvError, Result};
pub use config::Config;
pub use table::{BucketIter, LinearHashTable};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LinKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
