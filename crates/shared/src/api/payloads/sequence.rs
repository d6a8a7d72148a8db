use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{ensure_min, Sequence, ValidateModel},
    types::DateList,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSequence {
    #[serde(default)]
    pub sequence_dates: DateList,
    /// Seconds. A missing duration is stored as null
    #[serde(default)]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSequence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_dates: Option<DateList>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub duration: Option<Option<u32>>,
}

impl UpdateSequence {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, sequence: &mut Sequence) {
        if let Some(dates) = &self.sequence_dates {
            sequence.sequence_dates = dates.clone();
        }
        if let Some(duration) = self.duration {
            sequence.duration = duration;
        }
    }
}

fn validate_duration(duration: Option<u32>) -> Result<(), ValidationError> {
    duration.map_or(Ok(()), |d| ensure_min("duration", d, 1))
}

impl ValidateModel for NewSequence {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_duration(self.duration)
    }
}

impl ValidateModel for UpdateSequence {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_duration(self.duration.flatten())
    }
}
