//! Response handling and preview ownership.
//!
//! A 2xx response carries image bytes; anything else carries a JSON
//! [`ErrorBody`]. Only a successful response may touch the preview, and
//! installing a new preview always releases the old one first.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::pipeline::Stage;

/// Message shown when the service sends an empty error string.
pub const FALLBACK_ERROR: &str = "Server error";

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            stage: None,
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }
}

/// Image bytes returned by a successful request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Interpret a raw HTTP response.
///
/// `content_type` defaults to `image/png` when the service omits it.
pub fn handle_response(
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<ProcessedImage, ClientError> {
    if (200..300).contains(&status) {
        if body.is_empty() {
            return Err(ClientError::TransmissionFailure(
                "Empty response from server".to_string(),
            ));
        }
        return Ok(ProcessedImage {
            bytes: body.to_vec(),
            content_type: content_type.unwrap_or("image/png").to_string(),
        });
    }

    let parsed: ErrorBody = serde_json::from_slice(body).map_err(|_| {
        ClientError::TransmissionFailure(format!("Unreadable error response (HTTP {})", status))
    })?;

    let message = if parsed.error.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        parsed.error
    };

    Err(ClientError::Pipeline {
        message,
        stage: parsed.stage,
    })
}

/// A displayed preview that holds a releasable resource.
pub trait PreviewResource {
    /// Free whatever backs the preview. Called exactly once.
    fn release(self);
}

/// Single owner of the current preview.
#[derive(Debug)]
pub struct PreviewSlot<P: PreviewResource> {
    current: Option<P>,
}

impl<P: PreviewResource> Default for PreviewSlot<P> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<P: PreviewResource> PreviewSlot<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&P> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Install `preview`, releasing the previous one first.
    pub fn replace(&mut self, preview: P) {
        self.clear();
        self.current = Some(preview);
    }

    /// Release the current preview, if any.
    pub fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            old.release();
        }
    }
}

impl<P: PreviewResource> Drop for PreviewSlot<P> {
    fn drop(&mut self) {
        self.clear();
    }
}
