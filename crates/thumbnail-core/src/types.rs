//! Core data types produced by the derivation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pipeline::{ContentHash, ImageFormat};

/// Outcome of one successful pipeline invocation.
///
/// Both files named here exist on disk once this value is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    /// Digest of the submitted bytes; the stem of both file names
    pub content_hash: ContentHash,

    /// Format shared by the original and the thumbnail
    pub format: ImageFormat,

    /// `<dir>/<hash>.<ext>`
    pub original_path: PathBuf,

    /// `<dir>/thumb_<hash>.<ext>`
    pub thumbnail_path: PathBuf,

    /// Source width in pixels
    pub width: u32,

    /// Source height in pixels
    pub height: u32,

    /// Thumbnail width in pixels
    pub thumbnail_width: u32,

    /// Thumbnail height in pixels
    pub thumbnail_height: u32,

    /// Size of the submitted payload in bytes
    pub size_bytes: u64,
}
