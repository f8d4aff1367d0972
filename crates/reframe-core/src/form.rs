//! The editor form: settings, selected image, submission and preview together.
//!
//! This is the client-side controller the browser bindings drive. It owns no
//! transport. A submit yields a [`TransformRequest`] and a [`Ticket`]; the
//! caller transmits it and feeds the outcome back through [`EditorForm::finish`].

use tracing::{debug, warn};

use crate::decode::read_dimensions;
use crate::error::ClientError;
use crate::request::{encode_request, ImageUpload, TransformRequest};
use crate::response::{PreviewResource, PreviewSlot};
use crate::settings::SettingsModel;
use crate::submission::{Submission, SubmissionState, Ticket};

#[derive(Debug)]
pub struct EditorForm<P: PreviewResource> {
    settings: SettingsModel,
    image: Option<ImageUpload>,
    source_dimensions: Option<(u32, u32)>,
    submission: Submission,
    preview: PreviewSlot<P>,
}

impl<P: PreviewResource> Default for EditorForm<P> {
    fn default() -> Self {
        Self {
            settings: SettingsModel::new(),
            image: None,
            source_dimensions: None,
            submission: Submission::new(),
            preview: PreviewSlot::new(),
        }
    }
}

impl<P: PreviewResource> EditorForm<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &SettingsModel {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsModel {
        &mut self.settings
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    /// Dimensions of the selected image, when its header could be read.
    pub fn source_dimensions(&self) -> Option<(u32, u32)> {
        self.source_dimensions
    }

    /// Select a source image. The preview is left alone.
    pub fn select_image(&mut self, upload: ImageUpload) {
        self.source_dimensions = read_dimensions(&upload.bytes).ok();
        if self.source_dimensions.is_none() {
            debug!(file = %upload.file_name, "could not read source dimensions");
        }
        self.image = Some(upload);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
        self.source_dimensions = None;
    }

    pub fn state(&self) -> SubmissionState {
        self.submission.state()
    }

    pub fn preview(&self) -> Option<&P> {
        self.preview.current()
    }

    /// Message for the most recent failure, if the last attempt failed.
    pub fn error_message(&self) -> Option<String> {
        self.submission.last_error().map(|e| e.to_string())
    }

    /// Snapshot the settings and package a request.
    ///
    /// Nothing changes state unless this returns `Ok`; a rejected submit
    /// leaves the previous outcome in place.
    ///
    /// # Errors
    ///
    /// - `SubmissionInProgress` while another request is outstanding
    /// - `NoImageSelected` when no file is selected
    /// - `InvalidCrop` when the crop rectangle does not fit the known source
    pub fn submit(&mut self) -> Result<(Ticket, TransformRequest), ClientError> {
        if self.submission.is_submitting() {
            return Err(ClientError::SubmissionInProgress);
        }

        let snapshot = self.settings.get();
        if let Some((w, h)) = self.source_dimensions {
            snapshot.validate_against(w, h)?;
        }
        let request = encode_request(self.image.clone(), &snapshot)?;
        let ticket = self.submission.begin()?;
        Ok((ticket, request))
    }

    /// Feed back the outcome of a transmitted request.
    ///
    /// A success replaces the preview; a failure keeps it and records the
    /// error. Returns false, and releases any preview it was given, when the
    /// ticket is stale.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<P, ClientError>) -> bool {
        if !self.submission.is_current(ticket) {
            warn!(ticket = ticket.id(), "ignoring stale submission result");
            if let Ok(preview) = outcome {
                preview.release();
            }
            return false;
        }

        match outcome {
            Ok(preview) => {
                self.preview.replace(preview);
                self.submission.succeed(ticket)
            }
            Err(error) => {
                warn!(%error, "submission failed");
                self.submission.fail(ticket, error)
            }
        }
    }

    /// Abandon the in-flight request.
    pub fn cancel(&mut self) -> bool {
        self.submission.cancel()
    }
}
