//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Destination directories, one per ingress path.
///
/// Which directory a payload lands in is purely a policy of the ingress
/// layer; the pipeline itself accepts any existing directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Images uploaded as multipart form files
    pub multipart_dir: PathBuf,

    /// Images submitted as base64 JSON strings
    pub base64_dir: PathBuf,

    /// Images fetched from a remote URL
    pub reference_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            multipart_dir: PathBuf::from("./data/multipart"),
            base64_dir: PathBuf::from("./data/base64"),
            reference_dir: PathBuf::from("./data/reference"),
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body or remote image size in megabytes
    pub max_upload_mb: u64,

    /// Timeout for fetching a remote image in milliseconds
    pub fetch_timeout_ms: u64,

    /// Idle encode buffers kept for reuse (0 disables pooling)
    pub buffer_pool_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: 32,
            fetch_timeout_ms: 30_000,
            buffer_pool_capacity: 8,
        }
    }
}

impl LimitsConfig {
    /// The upload cap in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// The three ways an image can reach the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ingress {
    Multipart,
    Base64,
    Reference,
}

impl Ingress {
    /// All ingress paths, in route order.
    pub const ALL: [Ingress; 3] = [Ingress::Multipart, Ingress::Base64, Ingress::Reference];
}

impl fmt::Display for Ingress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ingress::Multipart => "multipart",
            Ingress::Base64 => "base64",
            Ingress::Reference => "reference",
        })
    }
}
