use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reframe_core::{ErrorBody, PipelineError, PipelineFailure};
use thiserror::Error;
use tracing::{error, warn};

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("No image file provided")]
    MissingImage,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("No settings provided")]
    MissingSettings,

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid multipart data: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MissingImage
            | ServerError::InvalidFileType
            | ServerError::MissingSettings
            | ServerError::InvalidSettings(_) => StatusCode::BAD_REQUEST,
            ServerError::Multipart(e) => e.status(),
            ServerError::Pipeline(e) => match &e.reason {
                PipelineFailure::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ if e.is_client_error() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ServerError::Pipeline(e) => ErrorBody::new(e.reason.to_string()).with_stage(e.stage),
            ServerError::Internal(_) => ErrorBody::new("Internal server error"),
            other => ErrorBody::new(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}
