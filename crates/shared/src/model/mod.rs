mod program;
pub use program::*;

mod challenge;
pub use challenge::*;

mod sequence;
pub use sequence::*;

mod workout;
pub use workout::*;

mod exercise;
pub use exercise::*;

mod participant;
pub use participant::*;

mod submission;
pub use submission::*;

mod profile;
pub use profile::*;

#[cfg(feature = "backend")]
mod credential;
#[cfg(feature = "backend")]
pub use credential::*;

#[cfg(feature = "backend")]
pub(crate) mod query;

use crate::api::error::ValidationError;

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Requests without a body
impl ValidateModel for () {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl<T: ValidateModel> ValidateModel for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.as_slice().validate()
    }
}

impl<T: ValidateModel> ValidateModel for [T] {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::collect(
            self.iter()
                .enumerate()
                .map(|(i, v)| v.validate().map_err(|e| e.prefixed(format!("[{i}]")))),
        )
    }
}

/// Check a numeric field meets a lower bound. Shared by the payload validators
pub(crate) fn ensure_min<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: T,
    min: T,
) -> Result<(), ValidationError> {
    if value < min {
        Err(ValidationError::new(format!("{field} must be at least {min}")))
    } else {
        Ok(())
    }
}
