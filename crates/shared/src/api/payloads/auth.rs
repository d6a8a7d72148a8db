use serde::{Deserialize, Serialize};

use crate::{api::error::ValidationError, model::ValidateModel};

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 32;
pub const PASSWORD_MIN_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
        return Err(ValidationError::new(format!(
            "username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::new(
            "username can only contain ascii alphanumeric, - and _",
        ));
    }
    Ok(())
}

impl ValidateModel for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let password = if self.password.chars().count() < PASSWORD_MIN_LENGTH {
            Err(ValidationError::new(format!(
                "password must be at least {PASSWORD_MIN_LENGTH} characters"
            )))
        } else {
            Ok(())
        };
        ValidationError::collect([validate_username(&self.username), password])
    }
}

impl ValidateModel for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() || self.password.is_empty() {
            Err(ValidationError::new("username and password are required"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("runner_01").is_ok());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username(&"x".repeat(USERNAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_register_collects_every_problem() {
        let req = RegisterRequest {
            username: "a b".to_owned(),
            password: "short".to_owned(),
            avatar_url: None,
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.error_messages.len(), 2);
    }
}
