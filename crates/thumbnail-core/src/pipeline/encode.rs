//! Format-specific encoding with default encoder settings.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage};

use crate::error::{PipelineError, PipelineResult};

use super::format::ImageFormat;

/// Encode `image` as `format`, appending the bytes to `out`.
///
/// JPEG uses the encoder's default quality (75) and PNG its default
/// compression. JPEG has no alpha channel, so images with one are flattened to
/// RGB first.
pub fn encode(image: &DynamicImage, format: ImageFormat, out: &mut Vec<u8>) -> PipelineResult<()> {
    let result = match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new(&mut *out);
            match image.color() {
                ColorType::L8 | ColorType::Rgb8 => image.write_with_encoder(encoder),
                _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder),
            }
        }
        ImageFormat::Png => image.write_with_encoder(PngEncoder::new(&mut *out)),
    };

    result.map_err(|e| PipelineError::Encode {
        format,
        message: e.to_string(),
    })
}
