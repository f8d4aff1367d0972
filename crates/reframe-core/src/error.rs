//! Errors surfaced to the person using the form.

use thiserror::Error;

use crate::pipeline::Stage;
use crate::transform::TransformError;

/// Everything that can go wrong between pressing submit and seeing a preview.
///
/// Each variant renders as a single human-readable message. None of them
/// touch the current preview or lock the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Submit was pressed before a file was chosen.
    #[error("Please select an image first")]
    NoImageSelected,

    /// The settings snapshot could not be serialized.
    #[error("Could not encode settings: {0}")]
    Encoding(String),

    /// The crop rectangle does not fit the selected image.
    #[error(transparent)]
    InvalidCrop(TransformError),

    /// The request never produced a usable response.
    #[error("{0}")]
    TransmissionFailure(String),

    /// The service ran the pipeline and reported a failure.
    #[error("{message}")]
    Pipeline {
        message: String,
        stage: Option<Stage>,
    },

    /// A submission is already in flight.
    #[error("A request is already being processed")]
    SubmissionInProgress,
}

impl ClientError {
    /// Stage reported by the service, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ClientError::Pipeline { stage, .. } => *stage,
            ClientError::InvalidCrop(_) => Some(Stage::Crop),
            _ => None,
        }
    }
}

impl From<TransformError> for ClientError {
    fn from(err: TransformError) -> Self {
        ClientError::InvalidCrop(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ClientError::NoImageSelected.to_string(), "Please select an image first");
        assert_eq!(
            ClientError::Pipeline {
                message: "Invalid file type".to_string(),
                stage: None
            }
            .to_string(),
            "Invalid file type"
        );
        assert_eq!(
            ClientError::TransmissionFailure("Server error".to_string()).to_string(),
            "Server error"
        );
    }

    #[test]
    fn test_invalid_crop_is_transparent() {
        let inner = TransformError::CropInvalidSize { width: 0, height: 5 };
        let err = ClientError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.stage(), Some(Stage::Crop));
    }

    #[test]
    fn test_stage_passthrough() {
        let err = ClientError::Pipeline {
            message: "boom".to_string(),
            stage: Some(Stage::Encode),
        };
        assert_eq!(err.stage(), Some(Stage::Encode));
        assert_eq!(ClientError::SubmissionInProgress.stage(), None);
    }
}
