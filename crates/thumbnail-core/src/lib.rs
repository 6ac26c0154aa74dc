//! Thumbnail Core - content-addressed image ingestion library.
//!
//! Takes an image payload and a destination directory, and stores a
//! re-encoded original plus a thumbnail under names derived from the
//! payload's content hash:
//!
//! ```text
//! bytes → Sniff (JPEG/PNG) → Hash → Decode → Encode ──→ <dir>/<hash>.<ext>
//!                                 └→ Decode → Resize → Encode → <dir>/thumb_<hash>.<ext>
//! ```
//!
//! Identical payloads always land on identical paths, so re-submitting an
//! image is idempotent.
//!
//! # Usage
//!
//! ```rust,ignore
//! use thumbnail_core::ImageProcessor;
//!
//! let processor = ImageProcessor::default();
//! let file = std::fs::File::open("photo.jpg")?;
//! let derivation = processor.process(file, "/srv/thumbs".as_ref())?;
//! println!("stored {}", derivation.original_path.display());
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, Ingress};
pub use error::{ConfigError, ErrorKind, PipelineError, PipelineResult};
pub use pipeline::{ContentHash, ImageFormat, ImageProcessor};
pub use types::Derivation;

use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Routes payloads from each ingress path into its configured directory.
///
/// Cheap to clone; clones share one processor and its buffer pool.
#[derive(Clone)]
pub struct Thumbnailer {
    config: Arc<Config>,
    processor: Arc<ImageProcessor>,
}

impl Thumbnailer {
    /// Create a new instance with the given configuration.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing thumbnailer v{}", VERSION);
        let processor = Arc::new(ImageProcessor::new(&config));
        Self {
            config: Arc::new(config),
            processor,
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a buffered payload through the pipeline into the directory for
    /// `ingress`, off the async runtime's worker threads.
    pub async fn ingest(&self, ingress: Ingress, data: Vec<u8>) -> PipelineResult<Derivation> {
        let dir = self.config.storage_dir(ingress);
        tracing::debug!(%ingress, bytes = data.len(), dir = %dir.display(), "Ingesting image");
        Arc::clone(&self.processor).process_detached(data, dir).await
    }
}
