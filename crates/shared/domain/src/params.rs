//! Request DTOs and their validation rules.

use serde::Deserialize;
use validator::Validate;

use crate::error::DomainResult;
use crate::password::Password;
use crate::user::{Gender, User};
use crate::validation::{
    parse_date_of_birth, validate_date_of_birth, validate_gender, validate_password_strength,
    validate_username,
};

/// User registration input.
///
/// Missing JSON fields fall back to empty values so that validation, not
/// deserialization, reports them.
#[derive(Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct CreateRequest {
    /// Unique email address
    #[validate(email(message = "must be a valid email address"))]
    #[cfg_attr(feature = "openapi", schema(example = "john@example.com"))]
    pub email: String,
    /// 7-15 ASCII letters or digits
    #[validate(
        length(min = 7, max = 15, message = "the length must be between 7 and 15"),
        custom(function = "validate_username")
    )]
    #[cfg_attr(feature = "openapi", schema(example = "johndoe1"))]
    pub username: String,
    #[validate(length(min = 1, message = "cannot be blank"))]
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: String,
    /// 8-30 characters mixing upper, lower, digit and symbol
    #[validate(
        length(min = 8, max = 30, message = "the length must be between 8 and 30"),
        custom(function = "validate_password_strength")
    )]
    #[cfg_attr(feature = "openapi", schema(example = "Passw0rd!"))]
    pub password: String,
    #[validate(custom(function = "validate_gender"))]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "Male"))]
    pub gender: Gender,
    #[validate(range(min = 8, max = 30, message = "must be between 8 and 30"))]
    #[cfg_attr(feature = "openapi", schema(example = 25))]
    pub age: i32,
    /// `YYYY-MM-DD`
    #[validate(custom(function = "validate_date_of_birth"))]
    #[cfg_attr(feature = "openapi", schema(example = "1998-01-01"))]
    pub date_of_birth: String,
}

impl std::fmt::Debug for CreateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .field("gender", &self.gender)
            .field("age", &self.age)
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}

impl CreateRequest {
    /// Build the domain user from a validated request.
    ///
    /// The password is hashed here; the identity is left nil for the
    /// repository to assign.
    pub fn into_user(self) -> DomainResult<User> {
        let date_of_birth = parse_date_of_birth(&self.date_of_birth)?;
        let password = Password::new(&self.password)?;

        Ok(User::new(
            self.username,
            password,
            self.name,
            self.age,
            self.email,
            self.gender,
            date_of_birth,
        ))
    }
}

/// Profile update input. Same rules as [`CreateRequest`] without the
/// identifying fields.
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub name: String,
    #[validate(
        length(min = 8, max = 30, message = "the length must be between 8 and 30"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Gender,
    #[validate(range(min = 8, max = 30, message = "must be between 8 and 30"))]
    pub age: i32,
    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: String,
}

impl std::fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUser")
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .field("gender", &self.gender)
            .field("age", &self.age)
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}

impl UpdateUser {
    /// Overwrite the mutable fields of `user`. Id, username and email are
    /// left untouched.
    pub fn apply_to(self, user: &mut User) -> DomainResult<()> {
        let date_of_birth = parse_date_of_birth(&self.date_of_birth)?;
        let password = Password::new(&self.password)?;

        user.name = self.name;
        user.password_hash = password.into_string();
        user.gender = self.gender;
        user.age = self.age;
        user.date_of_birth = date_of_birth;
        Ok(())
    }
}
