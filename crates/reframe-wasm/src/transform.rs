//! In-browser transform preview.
//!
//! Runs the same ordered pipeline the service runs, so the form can show a
//! local preview (or compute output dimensions) before anything is sent.

use crate::settings::TransformSettings;
use crate::types::JsDecodedImage;
use reframe_core::decode::decode_image;
use reframe_core::transform::compute_rotated_bounds;
use reframe_core::{PipelineError, TransformPipeline};
use wasm_bindgen::prelude::*;

fn to_js_error(err: PipelineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Decode `bytes` and apply `settings`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const settings = new TransformSettings();
/// settings.rotation = 90;
/// const preview = preview_transform(bytes, settings);
/// ctx.putImageData(new ImageData(new Uint8ClampedArray(preview.rgba()), preview.width), 0, 0);
/// ```
#[wasm_bindgen]
pub fn preview_transform(bytes: &[u8], settings: &TransformSettings) -> Result<JsDecodedImage, JsValue> {
    let decoded = decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    transform_decoded(&JsDecodedImage::from_decoded(decoded), settings)
}

/// Apply `settings` to an already decoded image.
#[wasm_bindgen]
pub fn transform_decoded(
    image: &JsDecodedImage,
    settings: &TransformSettings,
) -> Result<JsDecodedImage, JsValue> {
    run_pipeline(image, settings)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Decode and transform, returning the PNG the service would return.
#[wasm_bindgen]
pub fn process_image(bytes: &[u8], settings: &TransformSettings) -> Result<Vec<u8>, JsValue> {
    reframe_core::process_image(bytes, &settings.snapshot())
        .map(|encoded| encoded.bytes)
        .map_err(to_js_error)
}

/// Canvas size after a clockwise rotation, as `[width, height]`.
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, degrees: i32) -> Vec<u32> {
    let (w, h) = compute_rotated_bounds(width, height, degrees);
    vec![w, h]
}

fn run_pipeline(
    image: &JsDecodedImage,
    settings: &TransformSettings,
) -> Result<reframe_core::decode::DecodedImage, PipelineError> {
    TransformPipeline::default().run(image.to_decoded(), &settings.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> JsDecodedImage {
        let pixels: Vec<u8> = (0..(width * height * 3) as usize)
            .map(|i| (i % 256) as u8)
            .collect();
        JsDecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_default_settings_keep_size() {
        let img = test_image(40, 30);
        let out = run_pipeline(&img, &TransformSettings::new()).unwrap();
        assert_eq!(out.dimensions(), (40, 30));
    }

    #[test]
    fn test_rotation_90_swaps_dimensions() {
        let mut settings = TransformSettings::new();
        settings.set_rotation(90.0);
        let out = run_pipeline(&test_image(80, 60), &settings).unwrap();
        assert_eq!(out.dimensions(), (60, 80));
    }

    #[test]
    fn test_resize_and_crop() {
        let mut settings = TransformSettings::new();
        settings.set_crop_enabled(true);
        settings.set_crop_field("width", 40.0).unwrap();
        settings.set_crop_field("height", 20.0).unwrap();
        settings.set_width(20.0);
        let out = run_pipeline(&test_image(80, 60), &settings).unwrap();
        assert_eq!(out.dimensions(), (20, 10));
    }

    #[test]
    fn test_out_of_bounds_crop_fails() {
        let mut settings = TransformSettings::new();
        settings.set_crop_enabled(true);
        settings.set_crop_field("x", 75.0).unwrap();
        settings.set_crop_field("width", 10.0).unwrap();
        settings.set_crop_field("height", 10.0).unwrap();
        let err = run_pipeline(&test_image(80, 60), &settings).unwrap_err();
        assert_eq!(err.stage, reframe_core::Stage::Crop);
    }

    #[test]
    fn test_short_pixel_buffer_is_rejected() {
        let img = JsDecodedImage::new(4, 4, vec![0; 3]);

        let mut rotate = TransformSettings::new();
        rotate.set_rotation(90.0);
        let err = run_pipeline(&img, &rotate).unwrap_err();
        assert_eq!(err.stage, reframe_core::Stage::Decode);

        let mut crop = TransformSettings::new();
        crop.set_crop_enabled(true);
        crop.set_crop_field("width", 2.0).unwrap();
        crop.set_crop_field("height", 2.0).unwrap();
        let err = run_pipeline(&img, &crop).unwrap_err();
        assert_eq!(err.stage, reframe_core::Stage::Decode);
    }

    #[test]
    fn test_rotated_bounds() {
        assert_eq!(rotated_bounds(800, 600, 90), vec![600, 800]);
        assert_eq!(rotated_bounds(800, 600, -180), vec![800, 600]);
    }
}
