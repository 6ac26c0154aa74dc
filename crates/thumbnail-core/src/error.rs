//! Error types for the thumbnail derivation pipeline.
//!
//! Errors are organized by stage so the ingress layer can map each kind to a
//! transport status without parsing message text.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::ImageFormat;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, one variant per stage.
///
/// Every variant is terminal for the invocation that produced it.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input stream could not be drained, or was empty
    #[error("failed to read image stream: {0}")]
    StreamRead(#[source] std::io::Error),

    /// The payload is not a JPEG or PNG image
    #[error("unknown format")]
    UnsupportedFormat,

    /// The payload passed the signature check but its body does not decode
    #[error("failed to decode image: {message}")]
    Decode { message: String },

    /// The encoder rejected the image
    #[error("failed to encode {format} image: {message}")]
    Encode { format: ImageFormat, message: String },

    /// Writing an artifact to the destination directory failed
    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The blocking task running the pipeline was cancelled before finishing
    #[error("image processing was cancelled")]
    Cancelled,
}

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StreamRead,
    UnsupportedFormat,
    Decode,
    Encode,
    Persistence,
    Cancelled,
}

impl PipelineError {
    /// The stage this error came from.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::StreamRead(_) => ErrorKind::StreamRead,
            PipelineError::UnsupportedFormat => ErrorKind::UnsupportedFormat,
            PipelineError::Decode { .. } => ErrorKind::Decode,
            PipelineError::Encode { .. } => ErrorKind::Encode,
            PipelineError::Persistence { .. } => ErrorKind::Persistence,
            PipelineError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether the error was caused by the submitted payload rather than the
    /// service itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StreamRead | ErrorKind::UnsupportedFormat | ErrorKind::Decode
        )
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
