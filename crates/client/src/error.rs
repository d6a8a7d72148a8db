use std::fmt;

use http::StatusCode;
use shared::{api::error::ValidationError, types::Uuid};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server responded {status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Expected {expected} response, got {got:?}: {body}")]
    WrongContentType {
        expected: String,
        got: Option<String>,
        body: String,
    },
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl ClientError {
    /// Status code of an error the server reported
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Submit(e) => e.source.status(),
            _ => None,
        }
    }

    /// Message of an error the server reported
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => Some(message),
            ClientError::Submit(e) => e.source.server_message(),
            _ => None,
        }
    }
}

/// Which request of a multi-step submission failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStep {
    #[default]
    Challenge,
    Sequence { sequence: usize },
    Workout { sequence: usize, workout: usize },
}

impl fmt::Display for SubmitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitStep::Challenge => write!(f, "challenge"),
            SubmitStep::Sequence { sequence } => write!(f, "sequences[{sequence}]"),
            SubmitStep::Workout { sequence, workout } => {
                write!(f, "sequences[{sequence}].workouts[{workout}]")
            },
        }
    }
}

/// A sequential submission that stopped part way. Records what had been
/// created before the failing step and whether it was rolled back
#[derive(Debug, Error)]
#[error("Submission failed at {step}: {source}")]
pub struct SubmitError {
    pub step: SubmitStep,
    pub challenge_id: Option<Uuid>,
    pub sequences_created: usize,
    pub workouts_created: usize,
    /// The created challenge was deleted again, taking its sequences and
    /// workouts with it
    pub compensated: bool,
    pub source: Box<ClientError>,
}

/// Form edits that point at something that isn't there
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("No sequence at index {0}")]
    NoSuchSequence(usize),
    #[error("No workout at index {workout} in sequence {sequence}")]
    NoSuchWorkout { sequence: usize, workout: usize },
}
