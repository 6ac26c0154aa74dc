//! Content hashing for artifact naming and deduplication.

use blake3::Hasher as Blake3Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercase hex BLAKE3 digest of a full payload.
///
/// The only identity stored artifacts have: equal bytes always produce an
/// equal hash, and therefore the same file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the stored original, e.g. `<hash>.png`.
    pub fn original_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }

    /// File name of the stored thumbnail, e.g. `thumb_<hash>.png`.
    pub fn thumbnail_file_name(&self, extension: &str) -> String {
        format!("thumb_{}.{}", self.0, extension)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes content hashes.
pub struct Hasher;

impl Hasher {
    /// Hash an in-memory payload. Covers every byte, not just the sniffed
    /// prefix.
    pub fn content_hash(data: &[u8]) -> ContentHash {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        ContentHash(hasher.finalize().to_hex().to_string())
    }
}
