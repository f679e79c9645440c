//! Hash routing
//!
//! The two-hash addressing scheme of linear hashing. During a round the
//! table runs two modular hash functions side by side: buckets below the
//! split pointer have already been split this round and must be addressed
//! with the expanded hash; buckets at or above it keep the old one.
//!
//! Keys are signed, so reduction uses `rem_euclid`: the result is always
//! a valid bucket index even for negative keys.

/// The "old" mapping for the current round: `key mod base_size`.
pub fn pre_split_bucket(key: i32, base_size: u32) -> u32 {
    key.rem_euclid(base_size as i32) as u32
}

/// The "expanded" mapping: `key mod (2 * base_size)`.
///
/// Valid for a logical bucket once it has been split in the current round.
/// A record moved out of the bucket being split is by definition in
/// already-split territory, so split redistribution always uses this.
pub fn post_split_bucket(key: i32, base_size: u32) -> u32 {
    key.rem_euclid(2 * base_size as i32) as u32
}

/// The standard linear-hashing routing rule.
///
/// Lookup and delete always resolve through this; insert takes an
/// already-resolved bucket index so that callers (the split engine in
/// particular) control which hash generation is used.
pub fn current_bucket(key: i32, base_size: u32, split_pointer: u32) -> u32 {
    let bucket = pre_split_bucket(key, base_size);

    if bucket < split_pointer {
        post_split_bucket(key, base_size)
    } else {
        bucket
    }
}

// =============================================================================
// Tests
// =============================================================================
