//! Geometric transform stages: crop, resize, rotate and flip.
//!
//! Each stage is a free function from one [`DecodedImage`] to the next, so it
//! can be exercised on its own. [`crate::pipeline`] strings them together.
//!
//! # Transform Order
//!
//! 1. Crop (source pixel coordinates)
//! 2. Resize
//! 3. Rotate (clockwise)
//! 4. Flip
//!
//! # Coordinate System
//!
//! - Crop rectangles are in pixels of the stage input, origin top-left
//! - Rotation angles are in whole degrees, positive = clockwise
//!
//! [`DecodedImage`]: crate::decode::DecodedImage

mod crop;
mod flip;
mod resize;
mod rotation;

pub use crop::{apply_crop, validate_crop};
pub use flip::apply_flip;
pub use resize::{apply_resize, check_output_size, resolve_target_dimensions, MAX_OUTPUT_PIXELS};
pub use rotation::{compute_rotated_bounds, normalize_degrees, rotate_clockwise, BACKGROUND};

use thiserror::Error;

/// Errors raised by individual transform stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Crop width or height is zero.
    #[error("Crop size must be at least 1x1, got {width}x{height}")]
    CropInvalidSize { width: u32, height: u32 },

    /// Crop rectangle extends past the image edges.
    #[error(
        "Crop rectangle ({x}, {y}, {width}x{height}) exceeds image bounds {image_width}x{image_height}"
    )]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    /// Requested output would exceed [`MAX_OUTPUT_PIXELS`].
    #[error("Output of {width}x{height} exceeds the maximum of {max} pixels")]
    OutputTooLarge { width: u32, height: u32, max: u64 },

    /// The resampler rejected the input buffer.
    #[error("Resize failed: {0}")]
    ResizeFailed(String),
}

impl TransformError {
    /// True when the error is caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TransformError::ResizeFailed(_))
    }
}
