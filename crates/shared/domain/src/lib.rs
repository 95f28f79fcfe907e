//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the `User` entity, the request DTOs with their validation rules, and the
//! password value object.

pub mod constants;
pub mod error;
pub mod params;
pub mod password;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use params::{CreateRequest, UpdateUser};
pub use password::Password;
pub use user::{Gender, User, UserResponse};
pub use validation::{format_validation_errors, parse_date_of_birth};
