//! Pixel-space cropping.
//!
//! Rectangles are never clamped: one that reaches past the image edge is an
//! error.

use super::TransformError;
use crate::decode::DecodedImage;
use crate::settings::CropRect;

/// Check a crop rectangle against image dimensions.
///
/// # Errors
///
/// - `CropInvalidSize` if width or height is zero
/// - `CropOutOfBounds` if `x + width > image_width` or `y + height > image_height`
pub fn validate_crop(
    rect: &CropRect,
    image_width: u32,
    image_height: u32,
) -> Result<(), TransformError> {
    if rect.width < 1 || rect.height < 1 {
        return Err(TransformError::CropInvalidSize {
            width: rect.width,
            height: rect.height,
        });
    }

    let right = rect.x as u64 + rect.width as u64;
    let bottom = rect.y as u64 + rect.height as u64;
    if right > image_width as u64 || bottom > image_height as u64 {
        return Err(TransformError::CropOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            image_width,
            image_height,
        });
    }

    Ok(())
}

/// Extract the sub-rectangle `rect` from `image`.
///
/// # Example
///
/// ```
/// use reframe_core::decode::DecodedImage;
/// use reframe_core::settings::CropRect;
/// use reframe_core::transform::apply_crop;
///
/// let image = DecodedImage::filled(800, 600, [128, 128, 128]);
/// let cropped = apply_crop(&image, &CropRect::new(0, 0, 100, 100)).unwrap();
/// assert_eq!(cropped.dimensions(), (100, 100));
/// ```
pub fn apply_crop(image: &DecodedImage, rect: &CropRect) -> Result<DecodedImage, TransformError> {
    validate_crop(rect, image.width, image.height)?;

    if rect.x == 0 && rect.y == 0 && rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = rect.width as usize * 3;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    for y in rect.y..rect.y + rect.height {
        let start = y as usize * src_stride + rect.x as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(rect.width, rect.height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
