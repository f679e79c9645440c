//! Configuration for LinKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{LinkvError, Result};

/// Main configuration for a LinKV table instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the table's files.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── data.bin    (buckets + record slots)
    ///     └── state.bin   (scalar state snapshot + directory)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Table Geometry
    // -------------------------------------------------------------------------
    /// Initial number of anchor buckets; doubles each time a split round
    /// completes.
    pub base_size: u32,

    /// Load-factor percentage that triggers an incremental split.
    pub split_threshold: u32,

    /// Fixed slot capacity of every bucket (anchor or overflow).
    pub records_per_bucket: u32,

    /// Fixed value payload size in bytes; set once per table instance.
    pub value_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./linkv_data"),
            base_size: 4,
            split_threshold: 85,
            records_per_bucket: 4,
            value_size: 16,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate geometry before any file is touched.
    ///
    /// Invalid geometry is a fatal configuration error: the operation
    /// aborts with no partial state change.
    pub fn validate(&self) -> Result<()> {
        if self.base_size == 0 {
            return Err(LinkvError::Config(
                "base_size must be at least 1".to_string(),
            ));
        }
        if self.records_per_bucket == 0 {
            return Err(LinkvError::Config(
                "records_per_bucket must be at least 1".to_string(),
            ));
        }
        if self.value_size == 0 {
            return Err(LinkvError::Config(
                "value_size must be at least 1".to_string(),
            ));
        }
        if self.split_threshold == 0 {
            return Err(LinkvError::Config(
                "split_threshold must be a positive percentage".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all table files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the initial anchor bucket count
    pub fn base_size(mut self, size: u32) -> Self {
        self.config.base_size = size;
        self
    }

    /// Set the load-factor split threshold (percentage)
    pub fn split_threshold(mut self, pct: u32) -> Self {
        self.config.split_threshold = pct;
        self
    }

    /// Set the slot capacity per bucket
    pub fn records_per_bucket(mut self, count: u32) -> Self {
        self.config.records_per_bucket = count;
        self
    }

    /// Set the fixed value payload size (in bytes)
    pub fn value_size(mut self, size: u32) -> Self {
        self.config.value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
