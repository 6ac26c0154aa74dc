//! Payload format detection by signature sniffing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading bytes the detector inspects. Shorter payloads are
/// rejected outright.
pub const SNIFF_LEN: usize = 512;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = b"\xFF\xD8\xFF";

/// The closed set of image formats the service accepts and produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Classify a payload by its leading bytes.
    ///
    /// Returns `None` for payloads shorter than [`SNIFF_LEN`] and for every
    /// signature other than PNG and JPEG, including other image formats.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < SNIFF_LEN {
            return None;
        }
        let head = &bytes[..SNIFF_LEN];

        if head.starts_with(PNG_SIGNATURE) {
            Some(ImageFormat::Png)
        } else if head.starts_with(JPEG_SIGNATURE) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    /// File extension used for stored artifacts, without the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }

    /// MIME type matching the sniffed signature.
    pub const fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Map a codec-level format onto the supported set.
    pub fn from_codec(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
