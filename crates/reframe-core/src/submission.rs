//! Submission state machine.
//!
//! ```text
//!            begin              succeed
//!   Idle ───────────▶ Submitting ───────▶ Succeeded
//!    ▲                  │    │                │
//!    │      cancel      │    │ fail           │ begin
//!    └──────────────────┘    ▼                ▼
//!                          Failed ──begin──▶ Submitting
//! ```
//!
//! Only one submission can be in flight. Every `begin` hands out a
//! [`Ticket`]; a completion carrying an outdated ticket (after `cancel`, or
//! from an earlier attempt) is ignored.

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        }
    }
}

/// Identifies one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        Ticket(id)
    }
}

#[derive(Debug, Default)]
pub struct Submission {
    state: SubmissionState,
    generation: u64,
    last_error: Option<ClientError>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Error from the most recent failed attempt.
    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    /// Start a submission.
    ///
    /// # Errors
    ///
    /// `SubmissionInProgress` while another submission is outstanding.
    pub fn begin(&mut self) -> Result<Ticket, ClientError> {
        if self.is_submitting() {
            return Err(ClientError::SubmissionInProgress);
        }
        self.generation += 1;
        self.state = SubmissionState::Submitting;
        self.last_error = None;
        Ok(Ticket(self.generation))
    }

    /// True if `ticket` belongs to the submission in flight.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.is_submitting() && ticket.0 == self.generation
    }

    /// Mark the in-flight submission as succeeded. Returns false for a stale ticket.
    pub fn succeed(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = SubmissionState::Succeeded;
        true
    }

    /// Mark the in-flight submission as failed. Returns false for a stale ticket.
    pub fn fail(&mut self, ticket: Ticket, error: ClientError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = SubmissionState::Failed;
        self.last_error = Some(error);
        true
    }

    /// Abandon the in-flight submission, if any. Its ticket becomes stale.
    pub fn cancel(&mut self) -> bool {
        if !self.is_submitting() {
            return false;
        }
        self.generation += 1;
        self.state = SubmissionState::Idle;
        true
    }
}
