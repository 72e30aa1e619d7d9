//! Error handling for the shelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard error response format for all HTTP errors.
///
/// Account routes carry the text under `error` instead of `message`
/// (see [`MessageKey`]).
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    #[schema(value_type = Vec<Object>)]
    pub details: Vec<Value>,
    pub trace_id: String,
    pub timestamp: String,
}

/// Plain success acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON member that carries the human-readable error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKey {
    #[default]
    Message,
    Error,
}

impl MessageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::Message => "message",
            MessageKey::Error => "error",
        }
    }
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<Value>,
        code: String,
        message: String,
    },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error("conflict: {message}")]
    Conflict {
        details: Vec<Value>,
        code: String,
        message: String,
    },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String, code: String },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("upstream error: {message}")]
    Upstream { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    /// Create a bad request error for bodies that could not be parsed
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// Create a conflict error
    pub fn conflict(details: Vec<Value>, message: impl Into<String>) -> Self {
        Self::Conflict {
            details,
            code: "conflict".to_string(),
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            code: "unauthorized".to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create an error for a failed call to an external dependency
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            code: "upstream_error".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::BadRequest { .. }
            | AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Render under a specific message member.
    pub fn with_key(self, key: MessageKey) -> KeyedError {
        KeyedError { error: self, key }
    }

    fn render(self, key: MessageKey) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();

        let (error_code, message, details) = match self {
            AppError::Validation {
                details,
                code,
                message,
            }
            | AppError::Conflict {
                details,
                code,
                message,
            } => (code, message, details),
            AppError::BadRequest { message, code }
            | AppError::Unauthorized { message, code }
            | AppError::NotFound { message, code }
            | AppError::Upstream { message, code } => (code, message, Vec::new()),
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = ?e, "internal error");
                // Hide internal error details from clients in release builds
                let message = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };
                ("internal_error".to_string(), message, Vec::new())
            }
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                %message,
                "Request rejected"
            );
        }

        let mut body = json!({
            "code": error_code,
            "details": details,
            "trace_id": error_id.to_string(),
            "timestamp": timestamp
        });
        body[key.as_str()] = Value::String(message);

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.render(MessageKey::Message)
    }
}

/// An [`AppError`] bound to the member its text is rendered under.
#[derive(Debug)]
pub struct KeyedError {
    error: AppError,
    key: MessageKey,
}

impl KeyedError {
    pub fn error(&self) -> &AppError {
        &self.error
    }
}

impl IntoResponse for KeyedError {
    fn into_response(self) -> Response {
        self.error.render(self.key)
    }
}
