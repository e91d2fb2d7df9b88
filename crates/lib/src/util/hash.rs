//! Hashing utilities for content-addressed artifact names.
//!
//! This module provides:
//! - `ContentHash`: A full 64-character hash of a byte payload
//! - `ArtifactHash`: The short prefix embedded in artifact filenames
//! - `hash_bytes()`: Arbitrary byte hashing

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::ARTIFACT_HASH_PREFIX_LEN;

/// A full 64-character SHA256 hash of some content.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
  /// Truncate to the cache-busting suffix used in artifact filenames.
  pub fn short(&self) -> ArtifactHash {
    ArtifactHash(self.0[..ARTIFACT_HASH_PREFIX_LEN].to_string())
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// An 8-character hash prefix identifying an artifact's content.
///
/// This is a cache-busting suffix, not a collision-free address: two
/// different payloads sharing a prefix and naming components map to the same
/// file, and the later write wins.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactHash(pub String);

impl std::fmt::Display for ArtifactHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash arbitrary bytes.
///
/// Returns the full 64-character SHA256 hash.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}
