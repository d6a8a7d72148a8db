use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{api::error::ValidationError, model::ValidateModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reps_completed: Option<u32>,
    /// Seconds
    #[serde(default)]
    pub duration_taken: Option<u32>,
    #[serde(default)]
    pub proof_url: Option<String>,
}

impl ValidateModel for NewSubmission {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.proof_url {
            Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
                Err(ValidationError::new("proof_url must be an http(s) url"))
            },
            _ => Ok(()),
        }
    }
}
