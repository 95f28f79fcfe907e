//! Unified error handling.
//!
//! Every failure carries an [`ErrorCode`], a message and an optional cause.
//! The code is the only thing transport code branches on; the cause chain is
//! for diagnostics.

use std::error::Error as StdError;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;

use crate::response::ErrorReply;

/// Boxed cause carried by [`AppError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Closed set of machine-readable error codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    #[default]
    Unknown,
    InvalidArgument,
    NotFound,
    Unauthorized,
}

impl ErrorCode {
    /// Get error code for client
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error: code, message and optional wrapped cause.
#[derive(Debug)]
pub struct AppError {
    code: ErrorCode,
    message: String,
    source: Option<BoxError>,
}

impl AppError {
    /// Create an error without a cause.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap `cause` under `code` with additional context.
    pub fn wrap(cause: impl Into<BoxError>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Context message of this error alone, without the cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Immediate cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// HTTP status for this error's code
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    /// Iterate over this error and every cause below it.
    pub fn chain<'a>(&'a self) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
        std::iter::successors(
            Some(self as &'a (dyn StdError + 'static)),
            |e: &&'a (dyn StdError + 'static)| (*e).source(),
        )
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::Unknown => {
                tracing::error!(
                    code = %self.code,
                    chain = %self.chain().map(|e| e.to_string()).collect::<Vec<_>>().join(" -> "),
                    "Internal error"
                );
                if self.message.is_empty() {
                    "An internal error occurred".to_string()
                } else {
                    self.message.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, self.message.is_empty()) {
            (Some(source), true) => write!(f, "{}", source),
            (Some(source), false) => write!(f, "{}: {}", self.message, source),
            (None, _) => f.write_str(&self.message),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ErrorReply::new(self).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let code = match &err {
            DomainError::Validation(_)
            | DomainError::Password(_)
            | DomainError::Duplicate { .. } => ErrorCode::InvalidArgument,
            DomainError::Internal(_) => ErrorCode::Unknown,
        };
        AppError::wrap(err, code, "")
    }
}

// =============================================================================
// Database Error Conversion
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::wrap(err, ErrorCode::Unknown, "failed to perform db transaction")
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(message))
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AppError::new(ErrorCode::InvalidArgument, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::new(ErrorCode::NotFound, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Unauthorized, msg)
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Unknown, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::InvalidArgument.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::Unknown.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_without_cause() {
        let err = AppError::not_found("user with email a@b.co not found");
        assert_eq!(err.to_string(), "user with email a@b.co not found");
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_wrap_exposes_immediate_cause() {
        let inner = AppError::invalid_argument("bad input");
        let outer = AppError::wrap(inner, ErrorCode::Unknown, "outer");

        assert_eq!(outer.code(), ErrorCode::Unknown);
        assert_eq!(outer.message(), "outer");
        assert_eq!(outer.to_string(), "outer: bad input");

        let cause = outer.cause().unwrap();
        let inner = cause.downcast_ref::<AppError>().unwrap();
        assert_eq!(inner.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_chain_walks_every_cause() {
        let root = DomainError::validation("age: must be between 8 and 30");
        let mid = AppError::wrap(root, ErrorCode::InvalidArgument, "invalid user request");
        let top = AppError::wrap(mid, ErrorCode::InvalidArgument, "register");

        assert_eq!(top.chain().count(), 3);
        assert_eq!(
            top.to_string(),
            "register: invalid user request: Validation error: age: must be between 8 and 30"
        );
    }

    #[test]
    fn test_empty_message_displays_cause() {
        let err = AppError::from(DomainError::duplicate("username", "johndoe1"));
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.to_string(), "User with username johndoe1 already exists.");
    }

    #[test]
    fn test_domain_internal_maps_to_unknown() {
        let err = AppError::from(DomainError::internal("hash failed"));
        assert_eq!(err.code(), ErrorCode::Unknown);
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_unknown_hides_cause_from_user() {
        let err = AppError::wrap(
            "connection refused",
            ErrorCode::Unknown,
            "failed to perform db transaction",
        );
        assert_eq!(err.user_message(), "failed to perform db transaction");
        assert_eq!(
            err.to_string(),
            "failed to perform db transaction: connection refused"
        );
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<u8> = None;
        let err = missing.ok_or_not_found("nothing here").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(Some(1u8).ok_or_not_found("unused").unwrap(), 1);
    }
}
