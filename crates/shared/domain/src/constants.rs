//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Gender
// =============================================================================

/// Wire and storage value for [`crate::Gender::Male`]
pub const GENDER_MALE: &str = "Male";

/// Wire and storage value for [`crate::Gender::Female`]
pub const GENDER_FEMALE: &str = "Female";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Date of birth wire format (`YYYY-MM-DD`)
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Messages
// =============================================================================

/// Rejection message for passwords missing a required character class
pub const PASSWORD_POLICY_MESSAGE: &str = "Password must be minimum eight characters, at least one uppercase letter, one lowercase letter, one number and one special character";

/// Rejection message for an unparsable date of birth
pub const DATE_OF_BIRTH_MESSAGE: &str = "Date not valid, date format must be YYYY-MM-dd";

/// Rejection message for a gender other than Male or Female
pub const GENDER_MESSAGE: &str = "either be Female or Male";

/// Rejection message for usernames with non-alphanumeric characters
pub const USERNAME_CHARSET_MESSAGE: &str = "must contain English letters and digits only";
