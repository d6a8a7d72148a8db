use serde::{Deserialize, Serialize};

use crate::{api::error::ValidationError, model::ValidateModel};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProgram {
    #[serde(default)]
    pub name: Option<String>,
}

/// Only `name` can change. An empty string clears it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProgram {
    #[serde(default)]
    pub name: Option<String>,
}

impl NewProgram {
    /// Blank names are stored as null
    pub fn normalized_name(&self) -> Option<String> {
        self.name.as_ref().filter(|n| !n.trim().is_empty()).cloned()
    }
}

impl UpdateProgram {
    /// None when the name isn't being changed, Some(None) when it's being cleared
    pub fn name_change(&self) -> Option<Option<String>> {
        self.name.as_ref().map(|n| if n.is_empty() { None } else { Some(n.clone()) })
    }
}

impl ValidateModel for NewProgram {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl ValidateModel for UpdateProgram {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
