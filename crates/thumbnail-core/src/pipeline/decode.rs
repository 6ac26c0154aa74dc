//! Image decoding from an in-memory payload.

use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use crate::error::{PipelineError, PipelineResult};

use super::format::ImageFormat;

/// Result of decoding a payload.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Format the decoder determined from the content
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Stateless decoder over borrowed byte buffers.
///
/// Each call builds its own cursor, so the same buffer can be decoded any
/// number of times without seeking.
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode a full-resolution image.
    ///
    /// The format is determined from the content again rather than trusted
    /// from the sniffing step.
    pub fn decode(bytes: &[u8]) -> PipelineResult<DecodedImage> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                message: format!("cannot detect image format: {}", e),
            })?;

        let format = reader
            .format()
            .and_then(ImageFormat::from_codec)
            .ok_or(PipelineError::UnsupportedFormat)?;

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}
