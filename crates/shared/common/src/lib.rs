//! Common utilities shared across services.
//!
//! This crate provides:
//! - The code-carrying error type and its HTTP mapping
//! - The `{error, message, data}` response envelope
//! - Configuration structures

pub mod config;
pub mod error;
pub mod response;

pub use config::*;
pub use error::{AppError, AppResult, BoxError, ErrorCode, OptionExt};
pub use response::{ApiResponse, ErrorReply, Reply, ReplyExt};
