//! Resize stage.
//!
//! Target dimensions use `0` as a "keep" sentinel:
//!
//! | width | height | result                                   |
//! |-------|--------|------------------------------------------|
//! | 0     | 0      | no-op                                    |
//! | w     | 0      | `w` x height derived from aspect ratio   |
//! | 0     | h      | width derived from aspect ratio x `h`    |
//! | w     | h      | exactly `w` x `h` (stretch)              |

use super::TransformError;
use crate::decode::{DecodedImage, FilterType};

/// Largest output, in pixels, any stage may produce.
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Reject an output size above [`MAX_OUTPUT_PIXELS`].
pub fn check_output_size(width: u32, height: u32) -> Result<(), TransformError> {
    if width as u64 * height as u64 > MAX_OUTPUT_PIXELS {
        return Err(TransformError::OutputTooLarge {
            width,
            height,
            max: MAX_OUTPUT_PIXELS,
        });
    }
    Ok(())
}

/// Resolve requested dimensions against the current image size.
///
/// Returns `None` when both requested sides are zero. A derived side is
/// rounded to the nearest pixel and never smaller than 1.
pub fn resolve_target_dimensions(
    src_width: u32,
    src_height: u32,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    match (width, height) {
        (0, 0) => None,
        (w, 0) => {
            let ratio = src_height as f64 / src_width.max(1) as f64;
            let h = (w as f64 * ratio).round().clamp(1.0, u32::MAX as f64) as u32;
            Some((w, h))
        }
        (0, h) => {
            let ratio = src_width as f64 / src_height.max(1) as f64;
            let w = (h as f64 * ratio).round().clamp(1.0, u32::MAX as f64) as u32;
            Some((w, h))
        }
        (w, h) => Some((w, h)),
    }
}

/// Resize an image to exact dimensions.
///
/// `filter` of `None` picks a filter from the direction of the resize
/// (see [`FilterType::for_resize`]).
///
/// # Errors
///
/// Returns `OutputTooLarge` when `width * height` exceeds [`MAX_OUTPUT_PIXELS`].
pub fn apply_resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: Option<FilterType>,
) -> Result<DecodedImage, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::ResizeFailed(format!(
            "target dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }

    check_output_size(width, height)?;

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let filter = filter.unwrap_or_else(|| FilterType::for_resize(image.dimensions(), (width, height)));

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| TransformError::ResizeFailed("pixel buffer does not match dimensions".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}
