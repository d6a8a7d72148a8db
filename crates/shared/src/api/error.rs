use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "backend")]
pub use backend::*;

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_messages: Vec<String>,
}

impl ValidationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { error_messages: vec![message.into()] }
    }

    /// Collect the messages from several validations into one error, or Ok if
    /// none of them failed
    pub fn collect<I>(results: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = Result<(), ValidationError>>,
    {
        let error_messages: Vec<String> = results
            .into_iter()
            .filter_map(Result::err)
            .flat_map(|e| e.error_messages)
            .collect();

        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { error_messages })
        }
    }

    /// Prefix every message, used to point at an item inside a list.
    /// Index prefixes are joined straight on, so nesting reads `sequences[0]: ...`
    pub fn prefixed<S: AsRef<str>>(self, prefix: S) -> Self {
        let prefix = prefix.as_ref();
        Self {
            error_messages: self
                .error_messages
                .into_iter()
                .map(|m| {
                    if m.starts_with('[') {
                        format!("{prefix}{m}")
                    } else {
                        format!("{prefix}: {m}")
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ServerError {
    pub code: StatusCode,
    pub message: String,
}

impl ServerError {
    pub fn new<S: Into<String>>(code: StatusCode, message: S) -> Self {
        ServerError { code, message: message.into() }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody { error: self.message.clone() }
    }
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

pub trait ServerErrorContext<T> {
    /// Prefix the error message with some context. The status code is kept
    fn context<S: AsRef<str>>(self, context: S) -> Result<T, ServerError>;
}

impl<T, E: Into<ServerError>> ServerErrorContext<T> for Result<T, E> {
    fn context<S: AsRef<str>>(self, context: S) -> Result<T, ServerError> {
        self.map_err(|e| {
            let mut err: ServerError = e.into();
            err.message = format!("{}: {}", context.as_ref(), err.message);
            err
        })
    }
}

#[macro_export]
macro_rules! other_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::internal(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! bad_request_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::bad_request(format!($($arg)*))
    };
}

#[cfg(feature = "backend")]
mod backend {
    use axum::{
        extract::rejection::{JsonRejection, PathRejection},
        response::{IntoResponse, Response},
        Json,
    };
    use rusqlite::{ffi, ErrorCode};
    use tracing::{error, warn};

    use super::ServerError;

    // Render ServerError into a json response
    impl IntoResponse for ServerError {
        fn into_response(self) -> Response {
            if self.code.is_server_error() {
                error!(code = %self.code, "{}", self.message);
            } else {
                warn!(code = %self.code, "{}", self.message);
            }
            (self.code, Json(self.body())).into_response()
        }
    }

    impl From<rusqlite::Error> for ServerError {
        fn from(err: rusqlite::Error) -> Self {
            match &err {
                rusqlite::Error::QueryReturnedNoRows => Self::not_found("Row not found"),
                rusqlite::Error::SqliteFailure(
                    ffi::Error { code: ErrorCode::ConstraintViolation, extended_code },
                    _,
                ) => match *extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Self::conflict(err.to_string())
                    },
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY | ffi::SQLITE_CONSTRAINT_CHECK => {
                        Self::bad_request(err.to_string())
                    },
                    _ => Self::internal(err.to_string()),
                },
                _ => Self::internal(err.to_string()),
            }
        }
    }

    impl From<deadpool_sqlite::InteractError> for ServerError {
        fn from(err: deadpool_sqlite::InteractError) -> Self {
            Self::internal(format!("Database interact error: {err}"))
        }
    }

    impl From<deadpool_sqlite::PoolError> for ServerError {
        fn from(err: deadpool_sqlite::PoolError) -> Self {
            Self::internal(format!("Database pool error: {err}"))
        }
    }

    // Any body that can't be turned into the expected payload is a bad request,
    // including the cases axum would report as 415 or 422
    impl From<JsonRejection> for ServerError {
        fn from(rejection: JsonRejection) -> Self {
            Self::bad_request(rejection.body_text())
        }
    }

    impl From<PathRejection> for ServerError {
        fn from(rejection: PathRejection) -> Self {
            Self::bad_request(rejection.body_text())
        }
    }

    pub trait RowContext<T> {
        /// Turn a missing row into a 404 naming what was being looked up
        fn or_not_found<S: AsRef<str>>(self, what: S) -> Result<T, ServerError>;
    }

    impl<T> RowContext<T> for Result<T, rusqlite::Error> {
        fn or_not_found<S: AsRef<str>>(self, what: S) -> Result<T, ServerError> {
            self.map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    ServerError::not_found(format!("{} not found", what.as_ref()))
                },
                other => other.into(),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validation_collect() {
        let ok: Result<(), ValidationError> = Ok(());
        assert_eq!(ValidationError::collect([ok.clone(), ok]), Ok(()));

        let err = ValidationError::collect([
            Err(ValidationError::new("a")),
            Ok(()),
            Err(ValidationError::new("b").prefixed("workouts[1]")),
        ])
        .unwrap_err();
        assert_eq!(err.error_messages, vec!["a".to_owned(), "workouts[1]: b".to_owned()]);
        assert_eq!(err.to_string(), "a; workouts[1]: b");
    }

    #[test]
    fn test_nested_prefixes() {
        let err = ValidationError::new("reps must be at least 1")
            .prefixed("[1]")
            .prefixed("workouts")
            .prefixed("[0]")
            .prefixed("sequences");
        assert_eq!(err.error_messages, vec!["sequences[0]: workouts[1]: reps must be at least 1"]);
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err: ServerError = ValidationError::new("name is too short").into();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.body(), ErrorBody { error: "name is too short".to_owned() });
    }

    #[test]
    fn test_context_keeps_code() {
        let r: Result<(), ServerError> = Err(ServerError::not_found("Row not found"));
        let err = r.context("Challenge::fetch").unwrap_err();
        assert_eq!(err.code, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Challenge::fetch: Row not found");
    }
}
