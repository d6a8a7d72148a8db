use serde::{Deserialize, Serialize};

mod auth;
pub use auth::*;

mod program;
pub use program::*;

mod challenge;
pub use challenge::*;

mod sequence;
pub use sequence::*;

mod workout;
pub use workout::*;

mod submission;
pub use submission::*;

/// Returned by deletes and other calls that have no row to hand back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }
}
