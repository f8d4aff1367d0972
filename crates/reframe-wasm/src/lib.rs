//! Reframe WASM - WebAssembly bindings for the Reframe image form
//!
//! This crate exposes the client side of reframe-core to the browser page.
//!
//! # Module Structure
//!
//! - `settings` - Transform settings with clamping setters
//! - `form` - Form controller: image selection, submission, preview
//! - `request` - `FormData` encoding of a request
//! - `preview` - Object-URL previews
//! - `transform` - Local pipeline runs for instant previews
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageForm, TransformSettings } from '@reframe/wasm';
//!
//! await init();
//!
//! const form = new ImageForm();
//! const settings = new TransformSettings();
//! settings.width = 400;
//! form.settings = settings;
//! ```

use wasm_bindgen::prelude::*;

mod form;
mod preview;
mod request;
mod settings;
mod transform;
mod types;

pub use form::{JsImageForm, JsSubmission, DEFAULT_ENDPOINT};
pub use preview::ObjectUrlPreview;
pub use settings::TransformSettings;
pub use transform::{preview_transform, process_image, rotated_bounds, transform_decoded};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Endpoint the form posts to by default.
#[wasm_bindgen]
pub fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(default_endpoint(), "http://localhost:8000/process-image");
    }
}
