use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use serde_json::json;
use shelf_authz::{PasswordError, SessionError};
use shelf_db::StoreError;
use shelf_http::error::{AppError, MessageKey};
use thiserror::Error;

/// Failures of the account routes, rendered as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid JSON body")]
    MalformedBody(#[source] JsonRejection),

    #[error("Username and password are required")]
    MissingFields(Vec<&'static str>),

    #[error("Password must be at most 72 bytes and must not contain NUL characters")]
    UnsupportedPassword,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) => UserError::UsernameTaken,
            other => UserError::Store(other),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::MalformedBody(rejection) => {
                tracing::debug!(rejection = %rejection.body_text(), "rejected account body");
                AppError::bad_request(message)
            }
            UserError::MissingFields(fields) => AppError::validation(
                fields
                    .into_iter()
                    .map(|field| json!({"field": field, "error": "required"}))
                    .collect(),
                message,
            ),
            UserError::UnsupportedPassword | UserError::Password(PasswordError::Unsupported) => {
                AppError::validation(
                    vec![json!({"field": "password", "error": "unsupported"})],
                    UserError::UnsupportedPassword.to_string(),
                )
            }
            UserError::UsernameTaken => AppError::conflict(vec![], message),
            UserError::InvalidCredentials => AppError::unauthorized(message),
            UserError::Store(err) => AppError::Internal(err.into()),
            UserError::Password(err) => AppError::Internal(err.into()),
            UserError::Session(err) => AppError::Internal(err.into()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self)
            .with_key(MessageKey::Error)
            .into_response()
    }
}
