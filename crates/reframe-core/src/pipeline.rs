//! The transform pipeline: decode, crop, resize, rotate, flip, encode.
//!
//! The geometric stages are an explicit ordered list ([`Stage::TRANSFORMS`]).
//! Each one consumes the previous stage's image and either returns a new one
//! or passes its input through untouched when the settings make it a no-op.
//! The first failure aborts the run and names the stage it came from; no
//! partial output is ever produced.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decode::{decode_image, DecodeError, DecodedImage, FilterType};
use crate::encode::{encode_png_from_image, EncodeError, PNG_CONTENT_TYPE};
use crate::settings::{Flip, TransformSettings};
use crate::transform::{
    apply_crop, apply_flip, apply_resize, check_output_size, compute_rotated_bounds,
    resolve_target_dimensions, rotate_clockwise, TransformError, BACKGROUND,
};

/// A named pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Decode,
    Crop,
    Resize,
    Rotate,
    Flip,
    Encode,
}

impl Stage {
    /// The geometric stages in execution order.
    pub const TRANSFORMS: [Stage; 4] = [Stage::Crop, Stage::Resize, Stage::Rotate, Stage::Flip];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::Crop => "crop",
            Stage::Resize => "resize",
            Stage::Rotate => "rotate",
            Stage::Flip => "flip",
            Stage::Encode => "encode",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a stage failed.
#[derive(Debug, Error)]
pub enum PipelineFailure {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A pipeline failure tagged with the stage that raised it.
#[derive(Debug, Error)]
#[error("{stage}: {reason}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub reason: PipelineFailure,
}

impl PipelineError {
    pub fn new(stage: Stage, reason: impl Into<PipelineFailure>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }

    /// True when the request itself is at fault (bad crop, undecodable
    /// image, oversized output) rather than the service.
    pub fn is_client_error(&self) -> bool {
        match &self.reason {
            PipelineFailure::Decode(_) => true,
            PipelineFailure::Transform(e) => e.is_client_error(),
            PipelineFailure::Encode(_) => false,
        }
    }

    /// The transform error, if this failure came from a geometric stage.
    pub fn transform_error(&self) -> Option<&TransformError> {
        match &self.reason {
            PipelineFailure::Transform(e) => Some(e),
            _ => None,
        }
    }
}

/// Tunables that are not part of the wire settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Force a resampling filter. `None` chooses by resize direction.
    pub resize_filter: Option<FilterType>,
    /// Fill colour for canvas exposed by rotation.
    pub background: [u8; 3],
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            resize_filter: None,
            background: BACKGROUND,
        }
    }
}

/// Encoded pipeline output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
}

/// Runs the geometric stages in order under a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformPipeline {
    options: PipelineOptions,
}

impl TransformPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run one geometric stage.
    ///
    /// Returns the input unchanged when `settings` make the stage a no-op.
    /// `Decode` and `Encode` are not geometric and pass the image through.
    pub fn apply_stage(
        &self,
        stage: Stage,
        image: DecodedImage,
        settings: &TransformSettings,
    ) -> Result<DecodedImage, TransformError> {
        match stage {
            Stage::Crop => match settings.active_crop() {
                Some(rect) => apply_crop(&image, rect),
                None => Ok(image),
            },
            Stage::Resize => {
                match resolve_target_dimensions(image.width, image.height, settings.width, settings.height) {
                    Some((w, h)) => apply_resize(&image, w, h, self.options.resize_filter),
                    None => Ok(image),
                }
            }
            Stage::Rotate => match settings.normalized_rotation() {
                0 => Ok(image),
                _ => {
                    let (w, h) = compute_rotated_bounds(image.width, image.height, settings.rotation);
                    if w as u64 * h as u64 > image.width as u64 * image.height as u64 {
                        check_output_size(w, h)?;
                    }
                    Ok(rotate_clockwise(&image, settings.rotation, self.options.background))
                }
            },
            Stage::Flip => match settings.flip {
                Flip::None => Ok(image),
                flip => Ok(apply_flip(&image, flip)),
            },
            Stage::Decode | Stage::Encode => Ok(image),
        }
    }

    /// Apply every geometric stage to a decoded image.
    ///
    /// An image whose pixel buffer does not match its dimensions fails at
    /// `Decode` before any stage runs.
    pub fn run(
        &self,
        image: DecodedImage,
        settings: &TransformSettings,
    ) -> Result<DecodedImage, PipelineError> {
        image
            .check_buffer()
            .map_err(|e| PipelineError::new(Stage::Decode, e))?;

        let mut current = image;
        for stage in Stage::TRANSFORMS {
            current = self
                .apply_stage(stage, current, settings)
                .map_err(|e| PipelineError::new(stage, e))?;
            debug!(
                stage = %stage,
                width = current.width,
                height = current.height,
                "stage complete"
            );
        }
        Ok(current)
    }

    /// Decode `bytes`, run the geometric stages and encode the result as PNG.
    pub fn process(
        &self,
        bytes: &[u8],
        settings: &TransformSettings,
    ) -> Result<EncodedImage, PipelineError> {
        let decoded = decode_image(bytes).map_err(|e| PipelineError::new(Stage::Decode, e))?;
        debug!(
            width = decoded.width,
            height = decoded.height,
            "decoded source image"
        );

        let output = self.run(decoded, settings)?;

        let bytes = encode_png_from_image(&output).map_err(|e| PipelineError::new(Stage::Encode, e))?;
        debug!(len = bytes.len(), "encoded output");

        Ok(EncodedImage {
            bytes,
            width: output.width,
            height: output.height,
            content_type: PNG_CONTENT_TYPE,
        })
    }
}

/// Process raw image bytes with default [`PipelineOptions`].
pub fn process_image(bytes: &[u8], settings: &TransformSettings) -> Result<EncodedImage, PipelineError> {
    TransformPipeline::default().process(bytes, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CropRect;

    fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn run(image: DecodedImage, settings: TransformSettings) -> Result<DecodedImage, PipelineError> {
        TransformPipeline::default().run(image, &settings)
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(
            Stage::TRANSFORMS,
            [Stage::Crop, Stage::Resize, Stage::Rotate, Stage::Flip]
        );
    }

    #[test]
    fn test_stage_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Stage::Rotate).unwrap(), r#""rotate""#);
        let stage: Stage = serde_json::from_str(r#""decode""#).unwrap();
        assert_eq!(stage, Stage::Decode);
    }

    #[test]
    fn test_default_settings_keep_dimensions() {
        let img = gradient(800, 600);
        let out = run(img.clone(), TransformSettings::default()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_resize_width_only() {
        let settings = TransformSettings {
            width: 400,
            ..Default::default()
        };
        let out = run(gradient(800, 600), settings).unwrap();
        assert_eq!(out.dimensions(), (400, 300));
    }

    #[test]
    fn test_crop_within_bounds() {
        let settings = TransformSettings {
            crop: CropRect::new(0, 0, 100, 100),
            crop_enabled: true,
            ..Default::default()
        };
        let out = run(gradient(800, 600), settings).unwrap();
        assert_eq!(out.dimensions(), (100, 100));
    }

    #[test]
    fn test_crop_out_of_bounds_names_stage() {
        let settings = TransformSettings {
            crop: CropRect::new(750, 0, 100, 100),
            crop_enabled: true,
            ..Default::default()
        };
        let err = run(gradient(800, 600), settings).unwrap_err();
        assert_eq!(err.stage, Stage::Crop);
        assert!(matches!(
            err.transform_error(),
            Some(TransformError::CropOutOfBounds { .. })
        ));
        assert!(err.is_client_error());
        assert!(err.to_string().starts_with("crop: "));
    }

    #[test]
    fn test_crop_invalid_size() {
        let settings = TransformSettings {
            crop: CropRect::new(0, 0, 0, 10),
            crop_enabled: true,
            ..Default::default()
        };
        let err = run(gradient(20, 20), settings).unwrap_err();
        assert!(matches!(
            err.transform_error(),
            Some(TransformError::CropInvalidSize { .. })
        ));
    }

    #[test]
    fn test_rotate_quarter_turn_swaps_dimensions() {
        let settings = TransformSettings {
            rotation: 90,
            ..Default::default()
        };
        let out = run(gradient(800, 600), settings).unwrap();
        assert_eq!(out.dimensions(), (600, 800));
    }

    #[test]
    fn test_rotate_360_is_identity() {
        let img = gradient(30, 20);
        let settings = TransformSettings {
            rotation: 360,
            ..Default::default()
        };
        assert_eq!(run(img.clone(), settings).unwrap(), img);
    }

    #[test]
    fn test_crop_then_resize_then_rotate() {
        // Crop is in source coordinates; resize applies to the cropped region.
        let settings = TransformSettings {
            width: 50,
            rotation: 90,
            crop: CropRect::new(10, 10, 200, 100),
            crop_enabled: true,
            ..Default::default()
        };
        let out = run(gradient(800, 600), settings).unwrap();
        assert_eq!(out.dimensions(), (25, 50));
    }

    #[test]
    fn test_flip_runs_after_rotate() {
        let img = gradient(4, 3);
        let settings = TransformSettings {
            rotation: 90,
            flip: Flip::Horizontal,
            ..Default::default()
        };
        let out = run(img.clone(), settings).unwrap();
        let expected = apply_flip(&rotate_clockwise(&img, 90, BACKGROUND), Flip::Horizontal);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_arbitrary_rotation_uses_background_option() {
        let pipeline = TransformPipeline::new(PipelineOptions {
            background: [0, 0, 0],
            ..Default::default()
        });
        let settings = TransformSettings {
            rotation: 45,
            ..Default::default()
        };
        let out = pipeline.run(DecodedImage::filled(20, 20, [200, 200, 200]), &settings).unwrap();
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_oversized_resize_fails_in_resize_stage() {
        let settings = TransformSettings {
            width: 100_000,
            height: 100_000,
            ..Default::default()
        };
        let err = run(gradient(10, 10), settings).unwrap_err();
        assert_eq!(err.stage, Stage::Resize);
        assert!(matches!(
            err.transform_error(),
            Some(TransformError::OutputTooLarge { .. })
        ));
    }

    #[test]
    fn test_oversized_rotation_fails_in_rotate_stage() {
        // Only the dimensions are read before the size check rejects the canvas
        let image = DecodedImage {
            width: 10_000,
            height: 10_000,
            pixels: Vec::new(),
        };
        let settings = TransformSettings {
            rotation: 45,
            ..Default::default()
        };
        let err = TransformPipeline::default()
            .apply_stage(Stage::Rotate, image, &settings)
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::OutputTooLarge {
                width: 14_143,
                height: 14_143,
                max: crate::transform::MAX_OUTPUT_PIXELS,
            }
        );
        assert!(PipelineError::new(Stage::Rotate, err).is_client_error());
    }

    #[test]
    fn test_mismatched_buffer_fails_before_any_stage() {
        let image = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0; 3],
        };
        let settings = TransformSettings {
            rotation: 90,
            ..Default::default()
        };
        let err = run(image, settings).unwrap_err();
        assert_eq!(err.stage, Stage::Decode);
        assert!(matches!(
            err.reason,
            PipelineFailure::Decode(DecodeError::BufferMismatch { .. })
        ));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_process_image_round_trip() {
        let source = encode_png_from_image(&gradient(80, 60)).unwrap();
        let settings = TransformSettings {
            width: 40,
            rotation: 90,
            ..Default::default()
        };
        let encoded = process_image(&source, &settings).unwrap();
        assert_eq!((encoded.width, encoded.height), (30, 40));
        assert_eq!(encoded.content_type, "image/png");

        let decoded = decode_image(&encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (30, 40));
    }

    #[test]
    fn test_process_image_rejects_garbage() {
        let err = process_image(b"definitely not an image", &TransformSettings::default()).unwrap_err();
        assert_eq!(err.stage, Stage::Decode);
        assert!(err.is_client_error());
        assert!(err.transform_error().is_none());
    }

    #[test]
    fn test_process_image_rejects_empty() {
        let err = process_image(&[], &TransformSettings::default()).unwrap_err();
        assert_eq!(err.stage, Stage::Decode);
    }
}
