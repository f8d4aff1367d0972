//! Object-URL backed previews.

use reframe_core::response::{PreviewResource, ProcessedImage};
use wasm_bindgen::prelude::*;
use web_sys::Url;

use crate::request::bytes_to_blob;

/// A preview image exposed to the page as a `blob:` URL.
///
/// Released by revoking the URL; the slot that owns it guarantees that
/// happens before a replacement is shown.
#[derive(Debug)]
pub struct ObjectUrlPreview {
    url: String,
}

impl ObjectUrlPreview {
    pub fn from_processed(image: &ProcessedImage) -> Result<Self, JsValue> {
        let blob = bytes_to_blob(&image.bytes, &image.content_type)?;
        let url = Url::create_object_url_with_blob(&blob)?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PreviewResource for ObjectUrlPreview {
    fn release(self) {
        if Url::revoke_object_url(&self.url).is_err() {
            web_sys::console::warn_1(&JsValue::from_str("failed to revoke preview URL"));
        }
    }
}
