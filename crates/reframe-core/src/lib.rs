//! Reframe Core - Geometric image transforms
//!
//! This crate provides everything Reframe needs outside of I/O: the
//! transform settings model, the request contract between form and service,
//! the ordered transform pipeline (crop, resize, rotate, flip), response
//! handling, and the submission state machine.

pub mod decode;
pub mod encode;
pub mod error;
pub mod form;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod settings;
pub mod submission;
pub mod transform;

pub use error::ClientError;
pub use form::EditorForm;
pub use pipeline::{
    process_image, EncodedImage, PipelineError, PipelineFailure, PipelineOptions, Stage,
    TransformPipeline,
};
pub use request::{encode_request, ImageUpload, TransformRequest, IMAGE_PART, SETTINGS_PART};
pub use response::{handle_response, ErrorBody, PreviewResource, PreviewSlot, ProcessedImage};
pub use settings::{CropField, CropRect, Flip, SettingsModel, TransformSettings};
pub use submission::{Submission, SubmissionState, Ticket};
pub use transform::TransformError;
