//! Image derivation pipeline components.
//!
//! This module contains all the stages of the derivation pipeline:
//! - **format**: Signature sniffing for the supported formats
//! - **hash**: Content hashing that names stored artifacts
//! - **decode**: Decode a buffered payload
//! - **encode**: Format-specific encoding with default settings
//! - **thumbnail**: Fixed-box nearest-neighbour thumbnails
//! - **pool**: Reusable encode buffers
//! - **processor**: Orchestrates the full pipeline

pub mod decode;
pub mod encode;
pub mod format;
pub mod hash;
pub mod pool;
pub mod processor;
pub mod thumbnail;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use encode::encode;
pub use format::{ImageFormat, SNIFF_LEN};
pub use hash::{ContentHash, Hasher};
pub use pool::{BufferPool, PooledBuffer, MAX_RETAINED_BYTES};
pub use processor::ImageProcessor;
pub use thumbnail::{fit_within, ThumbnailGenerator, THUMBNAIL_SIZE};
