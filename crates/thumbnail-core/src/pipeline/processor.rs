//! Pipeline orchestration - wires together all derivation stages.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Derivation;

use super::decode::ImageDecoder;
use super::encode::encode;
use super::format::ImageFormat;
use super::hash::Hasher;
use super::pool::{BufferPool, PooledBuffer};
use super::thumbnail::ThumbnailGenerator;

/// An encoded artifact waiting to be written.
struct Rendition<'a> {
    format: ImageFormat,
    width: u32,
    height: u32,
    bytes: PooledBuffer<'a>,
}

/// Turns one image payload into a stored original and thumbnail pair.
///
/// Holds no per-payload state, so a single processor can be shared across
/// threads and requests.
pub struct ImageProcessor {
    pool: BufferPool,
}

impl ImageProcessor {
    /// Create a processor sized from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_pool_capacity(config.limits.buffer_pool_capacity)
    }

    /// Create a processor that keeps at most `capacity` idle encode buffers.
    pub fn with_pool_capacity(capacity: usize) -> Self {
        Self {
            pool: BufferPool::new(capacity),
        }
    }

    /// Drain `reader` and derive both artifacts into `dir`.
    ///
    /// `dir` must already exist; it is never created here.
    pub fn process<R: Read>(&self, mut reader: R, dir: &Path) -> PipelineResult<Derivation> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(PipelineError::StreamRead)?;
        self.process_bytes(&data, dir)
    }

    /// Derive both artifacts from an already-buffered payload.
    pub fn process_bytes(&self, data: &[u8], dir: &Path) -> PipelineResult<Derivation> {
        let start = Instant::now();

        if data.is_empty() {
            return Err(PipelineError::StreamRead(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "empty stream",
            )));
        }

        let sniffed = ImageFormat::detect(data).ok_or(PipelineError::UnsupportedFormat)?;
        tracing::trace!("  Sniffed: {} ({} bytes)", sniffed, data.len());

        let hash_start = Instant::now();
        let content_hash = Hasher::content_hash(data);
        tracing::trace!("  Content hash: {:?}", hash_start.elapsed());

        // Both renditions are produced before anything touches the disk, so a
        // decode or encode failure never leaves a lone file behind.
        let render_start = Instant::now();
        let original = self.render_original(data)?;
        tracing::trace!("  Original: {:?}", render_start.elapsed());

        let thumb_start = Instant::now();
        let thumbnail = self.render_thumbnail(data)?;
        tracing::trace!("  Thumbnail: {:?}", thumb_start.elapsed());

        let extension = original.format.extension();
        let original_path = dir.join(content_hash.original_file_name(extension));
        let thumbnail_path = dir.join(content_hash.thumbnail_file_name(extension));

        write_artifact(&original_path, &original.bytes)?;
        write_artifact(&thumbnail_path, &thumbnail.bytes)?;

        tracing::debug!(
            "Derived {} in {:?} ({}x{} -> {}x{})",
            content_hash,
            start.elapsed(),
            original.width,
            original.height,
            thumbnail.width,
            thumbnail.height
        );

        Ok(Derivation {
            content_hash,
            format: original.format,
            original_path,
            thumbnail_path,
            width: original.width,
            height: original.height,
            thumbnail_width: thumbnail.width,
            thumbnail_height: thumbnail.height,
            size_bytes: data.len() as u64,
        })
    }

    /// Run [`process_bytes`](Self::process_bytes) on the blocking thread pool.
    ///
    /// Decoding and encoding are CPU-bound; async callers use this to keep
    /// them off the runtime's worker threads. A panic inside the pipeline is
    /// resumed on the calling task.
    pub async fn process_detached(
        self: Arc<Self>,
        data: Vec<u8>,
        dir: PathBuf,
    ) -> PipelineResult<Derivation> {
        match tokio::task::spawn_blocking(move || self.process_bytes(&data, &dir)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::warn!("Processing task cancelled: {}", e);
                Err(PipelineError::Cancelled)
            }
        }
    }

    /// Decode at full resolution and re-encode with default settings.
    fn render_original(&self, data: &[u8]) -> PipelineResult<Rendition<'_>> {
        let decoded = ImageDecoder::decode(data)?;
        let mut bytes = self.pool.acquire();
        encode(&decoded.image, decoded.format, &mut bytes)?;
        Ok(Rendition {
            format: decoded.format,
            width: decoded.width,
            height: decoded.height,
            bytes,
        })
    }

    /// Decode independently, shrink into the thumbnail box and encode.
    fn render_thumbnail(&self, data: &[u8]) -> PipelineResult<Rendition<'_>> {
        let decoded = ImageDecoder::decode(data)?;
        let thumb = ThumbnailGenerator::generate(decoded.image);
        let mut bytes = self.pool.acquire();
        encode(&thumb, decoded.format, &mut bytes)?;
        Ok(Rendition {
            format: decoded.format,
            width: thumb.width(),
            height: thumb.height(),
            bytes,
        })
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> PipelineResult<()> {
    std::fs::write(path, bytes).map_err(|source| PipelineError::Persistence {
        path: path.to_path_buf(),
        source,
    })
}
