//! `FormData` materialization of an encoded request.

use js_sys::{Array, Uint8Array};
use reframe_core::request::{TransformRequest, IMAGE_PART, SETTINGS_PART};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// Wrap bytes in a `Blob` of the given MIME type.
pub(crate) fn bytes_to_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Build the two-part `FormData` body: `image` as a typed, named `Blob` and
/// `settings` as a JSON string.
pub(crate) fn to_form_data(request: &TransformRequest) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    let blob = bytes_to_blob(&request.image.bytes, &request.image.mime_type)?;
    form.append_with_blob_and_filename(IMAGE_PART, &blob, &request.image.file_name)?;
    form.append_with_str(SETTINGS_PART, &request.settings_json)?;
    Ok(form)
}
