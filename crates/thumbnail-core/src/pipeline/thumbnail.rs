//! Thumbnail derivation: fit within a fixed box, nearest-neighbour resampling.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Edge length of the square box every thumbnail fits inside.
pub const THUMBNAIL_SIZE: u32 = 100;

/// Compute thumbnail dimensions for a `width`×`height` source.
///
/// Images already inside the box keep their size. Otherwise the width is
/// brought down to the box first, then the height, each time scaling the other
/// edge proportionally with integer truncation and a floor of one pixel.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let (mut w, mut h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(max_width), u64::from(max_height));

    if w > max_w {
        h = (h * max_w / w).max(1);
        w = max_w;
    }
    if h > max_h {
        w = (w * max_h / h).max(1);
        h = max_h;
    }

    // Both values are bounded by the original u32 inputs.
    (w as u32, h as u32)
}

/// Generates fixed-size thumbnails.
pub struct ThumbnailGenerator;

impl ThumbnailGenerator {
    /// Shrink `image` to fit within [`THUMBNAIL_SIZE`]×[`THUMBNAIL_SIZE`].
    ///
    /// Never upscales: an image that already fits is returned unchanged.
    pub fn generate(image: DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (w, h) = fit_within(width, height, THUMBNAIL_SIZE, THUMBNAIL_SIZE);
        if (w, h) == (width, height) {
            return image;
        }
        image.resize_exact(w, h, FilterType::Nearest)
    }
}
