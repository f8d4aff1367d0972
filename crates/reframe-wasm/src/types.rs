//! WASM-compatible wrapper types for image data.

use reframe_core::decode::DecodedImage;
use wasm_bindgen::prelude::*;

/// A decoded RGB image for JavaScript.
///
/// Pixels live in WASM memory; `pixels()` copies them out as a
/// `Uint8Array`. `rgba()` expands to the layout `ImageData` expects, so a
/// locally computed preview can be drawn onto a canvas directly.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and RGB pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns RGBA pixel data with opaque alpha, for `new ImageData(...)`.
    pub fn rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for rgb in self.pixels.chunks_exact(3) {
            out.extend_from_slice(rgb);
            out.push(255);
        }
        out
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage (clones the pixel data).
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_rgba_expansion() {
        let img = JsDecodedImage::new(2, 1, vec![255, 128, 64, 32, 16, 8]);
        assert_eq!(img.rgba(), vec![255, 128, 64, 255, 32, 16, 8, 255]);
    }

    #[test]
    fn test_decoded_conversions() {
        let decoded = DecodedImage::filled(20, 10, [1, 2, 3]);
        let js_img = JsDecodedImage::from_decoded(decoded.clone());
        assert_eq!(js_img.width(), 20);
        assert_eq!(js_img.to_decoded(), decoded);
    }
}
