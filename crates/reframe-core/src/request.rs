//! Request encoding: one image plus one settings snapshot.
//!
//! The encoder only packages; it never transmits. The browser bindings turn
//! a [`TransformRequest`] into `FormData` with an [`IMAGE_PART`] file and a
//! [`SETTINGS_PART`] JSON string.

use crate::error::ClientError;
use crate::settings::TransformSettings;

/// Multipart part carrying the image bytes.
pub const IMAGE_PART: &str = "image";
/// Multipart part carrying the JSON settings.
pub const SETTINGS_PART: &str = "settings";

/// A user-selected source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// A fully encoded request, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub image: ImageUpload,
    /// The snapshot that was serialized into `settings_json`.
    pub settings: TransformSettings,
    pub settings_json: String,
}

/// Package an image and a settings snapshot.
///
/// # Errors
///
/// - `NoImageSelected` if `image` is `None`
/// - `Encoding` if the settings cannot be serialized
pub fn encode_request(
    image: Option<ImageUpload>,
    settings: &TransformSettings,
) -> Result<TransformRequest, ClientError> {
    let image = image.ok_or(ClientError::NoImageSelected)?;
    let settings_json = settings.to_json()?;

    Ok(TransformRequest {
        image,
        settings: *settings,
        settings_json,
    })
}
