//! Response envelope shared by every endpoint.
//!
//! Success and failure render the same shape: `{error?, message?, data?}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            error: None,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn failure(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            error: Some(error.into()),
            message,
            data: None,
        }
    }
}

/// Successful reply with an explicit status code
pub struct Reply<T: Serialize>(pub StatusCode, pub ApiResponse<T>);

impl<T: Serialize> Reply<T> {
    /// 200 with data
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self(StatusCode::OK, ApiResponse::success(message, data))
    }
}

impl Reply<()> {
    /// 201 without data
    pub fn created(message: impl Into<String>) -> Self {
        Self(StatusCode::CREATED, ApiResponse::message(message))
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

/// Failed reply: an [`AppError`] plus the handler's description of what
/// it was doing.
#[derive(Debug)]
pub struct ErrorReply {
    message: Option<String>,
    error: AppError,
}

impl ErrorReply {
    pub fn new(error: AppError) -> Self {
        Self {
            message: None,
            error,
        }
    }

    pub fn with_message(error: AppError, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error,
        }
    }

    pub fn error(&self) -> &AppError {
        &self.error
    }
}

impl From<AppError> for ErrorReply {
    fn from(error: AppError) -> Self {
        ErrorReply::new(error)
    }
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let body = ApiResponse::failure(self.error.user_message(), self.message);

        (status, Json(body)).into_response()
    }
}

/// Attach a handler message to a failed result
pub trait ReplyExt<T> {
    fn or_reply(self, message: &str) -> Result<T, ErrorReply>;
}

impl<T, E: Into<AppError>> ReplyExt<T> for Result<T, E> {
    fn or_reply(self, message: &str) -> Result<T, ErrorReply> {
        self.map_err(|e| ErrorReply::with_message(e.into(), message))
    }
}
