//! Utility functions and helpers
//!
//! Hashing, timestamps and the canonical encoding that block and
//! proof-of-work digests are computed over.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, hash_hex, sha256_digest};

pub use serialization::{canonical_json, digest};
