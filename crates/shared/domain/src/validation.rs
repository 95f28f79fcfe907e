//! Field rules shared by the request DTOs.
//!
//! Declarative length/range/email checks live on the DTOs as `validator`
//! attributes; the rules here cover what those attributes cannot express.

use std::borrow::Cow;

use chrono::NaiveDate;
use validator::{ValidationError, ValidationErrors};

use crate::constants::{
    DATE_OF_BIRTH_FORMAT, DATE_OF_BIRTH_MESSAGE, GENDER_MESSAGE, PASSWORD_POLICY_MESSAGE,
    USERNAME_CHARSET_MESSAGE,
};
use crate::error::{DomainError, DomainResult};
use crate::user::Gender;

/// Parse a `YYYY-MM-DD` date of birth.
///
/// Both the validator rule and `User` construction go through here, so a
/// value accepted by one is accepted by the other.
pub fn parse_date_of_birth(value: &str) -> DomainResult<NaiveDate> {
    if !has_date_shape(value) {
        return Err(DomainError::validation(DATE_OF_BIRTH_MESSAGE));
    }

    NaiveDate::parse_from_str(value, DATE_OF_BIRTH_FORMAT)
        .map_err(|_| DomainError::validation(DATE_OF_BIRTH_MESSAGE))
}

/// Exactly `DDDD-DD-DD`. chrono alone accepts unpadded fields, signs and
/// leading whitespace.
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Username may only contain ASCII letters and digits.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(rule_error("alphanumeric", USERNAME_CHARSET_MESSAGE))
    }
}

/// Password must mix upper case, lower case, digits and symbols.
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_number = false;
    let mut has_special = false;

    for c in value.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_numeric() {
            has_number = true;
        } else if is_symbol(c) {
            has_special = true;
        }
    }

    if has_upper && has_lower && has_number && has_special {
        Ok(())
    } else {
        Err(rule_error("password_policy", PASSWORD_POLICY_MESSAGE))
    }
}

/// Gender must be Male or Female.
pub fn validate_gender(gender: &Gender) -> Result<(), ValidationError> {
    if gender.is_defined() {
        Ok(())
    } else {
        Err(rule_error("gender", GENDER_MESSAGE))
    }
}

/// Date of birth must parse as `YYYY-MM-DD`.
pub fn validate_date_of_birth(value: &str) -> Result<(), ValidationError> {
    parse_date_of_birth(value)
        .map(|_| ())
        .map_err(|_| rule_error("date", DATE_OF_BIRTH_MESSAGE))
}

/// Render validation errors as `field: message` pairs.
///
/// Only the first failure of each field is reported; fields are sorted by
/// name so the output is stable.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                (field.to_string(), message)
            })
        })
        .collect();
    fields.sort();

    fields
        .into_iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn is_symbol(c: char) -> bool {
    c.is_ascii_punctuation() || !(c.is_alphanumeric() || c.is_whitespace() || c.is_control())
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
