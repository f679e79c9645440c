//! Error types for LinKV
//!
//! Provides a unified error type for all operations.
//!
//! Not-found is deliberately *not* an error: `get` returns `Ok(None)` and
//! `delete`/`update` return an affected-record count of 0, so batch-style
//! callers can inspect outcomes without exception-style control flow.

use thiserror::Error;

/// Result type alias using LinkvError
pub type Result<T> = std::result::Result<T, LinkvError>;

/// Unified error type for LinKV operations
#[derive(Debug, Error)]
pub enum LinkvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("State file corruption detected: {0}")]
    StateCorruption(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Key Domain Errors
    // -------------------------------------------------------------------------
    /// Negative keys collide with the tombstone sentinel and are rejected
    /// at the public surface.
    #[error("Invalid key {0}: keys must be non-negative")]
    InvalidKey(i32),

    /// Values are fixed-size per table instance; a payload of any other
    /// length cannot be stored.
    #[error("Value size mismatch: got {got} bytes, table is configured for {expected}")]
    ValueSize { got: usize, expected: u32 },
}
