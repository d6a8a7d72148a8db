use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{NewSequence, NewWorkout};
use crate::{
    api::error::ValidationError,
    model::{ensure_min, Challenge, ChallengeStatus, Sequence, ValidateModel, Workout},
    types::Uuid,
};

pub const CHALLENGE_NAME_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChallenge {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub entry_fee: f64,
    #[serde(default)]
    pub status: Option<ChallengeStatus>,
    #[serde(default)]
    pub program_id: Option<Uuid>,
}

/// Partial update. Fields left out of the body are left untouched.
/// `description` can be explicitly set to null
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateChallenge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ChallengeStatus>,
}

impl UpdateChallenge {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the supplied fields to an existing row
    pub fn apply_to(&self, challenge: &mut Challenge) {
        if let Some(name) = &self.name {
            challenge.name = name.trim().to_owned();
        }
        if let Some(description) = &self.description {
            challenge.description = description.clone();
        }
        if let Some(start_date) = self.start_date {
            challenge.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            challenge.end_date = end_date;
        }
        if let Some(entry_fee) = self.entry_fee {
            challenge.entry_fee = entry_fee;
        }
        if let Some(status) = self.status {
            challenge.status = status;
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < CHALLENGE_NAME_MIN_LENGTH {
        Err(ValidationError::new(format!(
            "name must be at least {CHALLENGE_NAME_MIN_LENGTH} characters"
        )))
    } else {
        Ok(())
    }
}

fn validate_entry_fee(entry_fee: f64) -> Result<(), ValidationError> {
    if !entry_fee.is_finite() {
        return Err(ValidationError::new("entry_fee must be a number"));
    }
    ensure_min("entry_fee", entry_fee, 0.0)
}

pub fn validate_dates(
    start_date: &NaiveDateTime,
    end_date: &NaiveDateTime,
) -> Result<(), ValidationError> {
    if end_date < start_date {
        Err(ValidationError::new("end_date must not be before start_date"))
    } else {
        Ok(())
    }
}

impl ValidateModel for NewChallenge {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::collect([
            validate_name(&self.name),
            validate_entry_fee(self.entry_fee),
            validate_dates(&self.start_date, &self.end_date),
        ])
    }
}

impl ValidateModel for UpdateChallenge {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::collect([
            self.name.as_deref().map_or(Ok(()), validate_name),
            self.entry_fee.map_or(Ok(()), validate_entry_fee),
            match (&self.start_date, &self.end_date) {
                (Some(start), Some(end)) => validate_dates(start, end),
                _ => Ok(()),
            },
        ])
    }
}

/// A challenge with all of its sequences and their workouts, created in one
/// transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChallengeTree {
    #[serde(flatten)]
    pub challenge: NewChallenge,
    #[serde(default)]
    pub sequences: Vec<NewSequenceTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSequenceTree {
    #[serde(flatten)]
    pub sequence: NewSequence,
    #[serde(default)]
    pub workouts: Vec<NewWorkout>,
}

impl ValidateModel for NewSequenceTree {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::collect([
            self.sequence.validate(),
            self.workouts.validate().map_err(|e| e.prefixed("workouts")),
        ])
    }
}

impl ValidateModel for NewChallengeTree {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::collect([
            self.challenge.validate(),
            self.sequences.validate().map_err(|e| e.prefixed("sequences")),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeTree {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub sequences: Vec<SequenceTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceTree {
    #[serde(flatten)]
    pub sequence: Sequence,
    pub workouts: Vec<Workout>,
}
