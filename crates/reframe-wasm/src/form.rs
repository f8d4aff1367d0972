//! Browser form controller.
//!
//! The page owns the DOM and `fetch`; this type owns everything else. A
//! submit returns a [`JsSubmission`] holding the `FormData` and a ticket.
//! The page posts it and reports back with `receive` (any HTTP response) or
//! `transmission_failed` (the request itself rejected).
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const form = new ImageForm();
//! form.select_image(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! form.settings = settings;
//!
//! const submission = form.submit();
//! try {
//!   const res = await fetch(submission.endpoint, { method: 'POST', body: submission.form_data });
//!   const body = new Uint8Array(await res.arrayBuffer());
//!   img.src = form.receive(submission.ticket, res.status, res.headers.get('Content-Type'), body) ?? img.src;
//! } catch (e) {
//!   form.transmission_failed(submission.ticket, String(e));
//! }
//! ```

use reframe_core::response::handle_response;
use reframe_core::{ClientError, EditorForm, ImageUpload, Ticket};
use wasm_bindgen::prelude::*;
use web_sys::{console, FormData};

use crate::preview::ObjectUrlPreview;
use crate::request::to_form_data;
use crate::settings::TransformSettings;
use crate::transform::transform_decoded;
use crate::types::JsDecodedImage;

/// Where requests go unless the page overrides it.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/process-image";

fn to_js_error(err: &ClientError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One outstanding request, ready for `fetch`.
#[wasm_bindgen]
pub struct JsSubmission {
    ticket: u64,
    endpoint: String,
    form_data: FormData,
}

#[wasm_bindgen]
impl JsSubmission {
    #[wasm_bindgen(getter)]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    #[wasm_bindgen(getter)]
    pub fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn form_data(&self) -> FormData {
        self.form_data.clone()
    }
}

/// The image transform form.
#[wasm_bindgen(js_name = ImageForm)]
pub struct JsImageForm {
    editor: EditorForm<ObjectUrlPreview>,
    endpoint: String,
}

#[wasm_bindgen(js_class = ImageForm)]
impl JsImageForm {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            editor: EditorForm::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_endpoint(&mut self, endpoint: String) {
        self.endpoint = endpoint;
    }

    /// A copy of the current settings.
    #[wasm_bindgen(getter)]
    pub fn settings(&self) -> TransformSettings {
        TransformSettings::from_snapshot(self.editor.settings().get())
    }

    /// Replace the current settings with a copy of `settings`.
    #[wasm_bindgen(setter)]
    pub fn set_settings(&mut self, settings: &TransformSettings) {
        *self.editor.settings_mut() = settings.snapshot().into();
    }

    /// Select the source file.
    pub fn select_image(&mut self, file_name: String, mime_type: String, bytes: Vec<u8>) {
        self.editor.select_image(ImageUpload::new(file_name, mime_type, bytes));
    }

    pub fn clear_image(&mut self) {
        self.editor.clear_image();
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.editor.image().is_some()
    }

    /// Source `[width, height]`, or empty if the header could not be read.
    pub fn source_dimensions(&self) -> Vec<u32> {
        self.editor
            .source_dimensions()
            .map(|(w, h)| vec![w, h])
            .unwrap_or_default()
    }

    /// "idle", "submitting", "succeeded" or "failed".
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.editor.state().as_str().to_string()
    }

    /// Message of the last failure, if the last submission failed.
    #[wasm_bindgen(getter)]
    pub fn error_message(&self) -> Option<String> {
        self.editor.error_message()
    }

    /// Object URL of the current preview.
    #[wasm_bindgen(getter)]
    pub fn preview_url(&self) -> Option<String> {
        self.editor.preview().map(|p| p.url().to_string())
    }

    /// Snapshot the settings and package the request.
    ///
    /// Throws (and sends nothing) when no image is selected, the crop does
    /// not fit the image, or a request is already outstanding.
    pub fn submit(&mut self) -> Result<JsSubmission, JsValue> {
        let (ticket, request) = self.editor.submit().map_err(|e| to_js_error(&e))?;

        match to_form_data(&request) {
            Ok(form_data) => Ok(JsSubmission {
                ticket: ticket.id(),
                endpoint: self.endpoint.clone(),
                form_data,
            }),
            Err(err) => {
                let error = ClientError::Encoding(format!("{:?}", err));
                self.editor.finish(ticket, Err(error.clone()));
                Err(to_js_error(&error))
            }
        }
    }

    /// Report an HTTP response.
    ///
    /// Returns the new preview URL on success, or `undefined` if the ticket
    /// is stale. Throws the error message on failure; the previous preview
    /// stays in place.
    pub fn receive(
        &mut self,
        ticket: u64,
        status: u16,
        content_type: Option<String>,
        body: Vec<u8>,
    ) -> Result<Option<String>, JsValue> {
        let ticket = Ticket::from_id(ticket);
        let outcome = handle_response(status, content_type.as_deref(), &body).and_then(|image| {
            ObjectUrlPreview::from_processed(&image)
                .map_err(|e| ClientError::TransmissionFailure(format!("{:?}", e)))
        });

        match outcome {
            Ok(preview) => {
                let url = preview.url().to_string();
                Ok(self.editor.finish(ticket, Ok(preview)).then_some(url))
            }
            Err(error) => {
                let message = error.to_string();
                if self.editor.finish(ticket, Err(error)) {
                    console::error_1(&JsValue::from_str(&message));
                    Err(JsValue::from_str(&message))
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Report that the request never produced a response.
    pub fn transmission_failed(&mut self, ticket: u64, message: String) {
        let message = if message.is_empty() {
            reframe_core::response::FALLBACK_ERROR.to_string()
        } else {
            message
        };
        console::error_1(&JsValue::from_str(&message));
        self.editor
            .finish(Ticket::from_id(ticket), Err(ClientError::TransmissionFailure(message)));
    }

    /// Abandon the outstanding request; its response will be ignored.
    pub fn cancel(&mut self) -> bool {
        self.editor.cancel()
    }

    /// Run the pipeline locally on the selected image.
    pub fn preview_locally(&self) -> Result<JsDecodedImage, JsValue> {
        let image = self
            .editor
            .image()
            .ok_or_else(|| to_js_error(&ClientError::NoImageSelected))?;
        let decoded = reframe_core::decode::decode_image(&image.bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        transform_decoded(&JsDecodedImage::from_decoded(decoded), &self.settings())
    }
}

impl Default for JsImageForm {
    fn default() -> Self {
        Self::new()
    }
}
