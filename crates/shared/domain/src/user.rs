//! User domain entity and related types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{GENDER_FEMALE, GENDER_MALE};
use crate::password::Password;

/// Gender enumeration.
///
/// `Undefined` is never stored; it is what unrecognized wire or database
/// values convert to, so validation can reject them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Undefined,
}

impl Gender {
    /// Male or Female
    pub fn is_defined(&self) -> bool {
        !matches!(self, Gender::Undefined)
    }
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s {
            GENDER_MALE => Gender::Male,
            GENDER_FEMALE => Gender::Female,
            _ => Gender::Undefined,
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Gender::from(s.as_str())
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.to_string()
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "{}", GENDER_MALE),
            Gender::Female => write!(f, "{}", GENDER_FEMALE),
            Gender::Undefined => Ok(()),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
}

impl User {
    /// Create a user without an identity.
    ///
    /// The id stays nil until [`User::assign_new_id`] is called by the
    /// repository that persists it.
    pub fn new(
        username: String,
        password: Password,
        name: String,
        age: i32,
        email: String,
        gender: Gender,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            username,
            password_hash: password.into_string(),
            name,
            age,
            email,
            gender,
            date_of_birth,
        }
    }

    /// Replace the identity with a freshly generated one and return it.
    pub fn assign_new_id(&mut self) -> Uuid {
        self.id = Uuid::new_v4();
        self.id
    }

    /// Check if the user has been given an identity
    pub fn has_identity(&self) -> bool {
        !self.id.is_nil()
    }

    /// Stored password hash as a value object
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.clone())
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// Unique login name
    #[cfg_attr(feature = "openapi", schema(example = "johndoe1"))]
    pub username: String,
    /// Display name
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: String,
    /// "Male" or "Female"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[cfg_attr(feature = "openapi", schema(example = "Male"))]
    pub gender: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date_of_birth: NaiveDate,
    pub age: i32,
    /// Unique email address
    #[cfg_attr(feature = "openapi", schema(example = "john@example.com"))]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            gender: user.gender.to_string(),
            username: user.username,
            name: user.name,
            date_of_birth: user.date_of_birth,
            age: user.age,
            email: user.email,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            gender: user.gender.to_string(),
            date_of_birth: user.date_of_birth,
            age: user.age,
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::nil(),
            username: "johndoe1".to_string(),
            password_hash: "hashed".to_string(),
            name: "John Doe".to_string(),
            age: 25,
            email: "john@example.com".to_string(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1998, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::Male.to_string(), "Male");
        assert_eq!(Gender::Female.to_string(), "Female");
        assert_eq!(Gender::Undefined.to_string(), "");
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!(Gender::from("Male"), Gender::Male);
        assert_eq!(Gender::from("Female"), Gender::Female);
        // Unknown values fail safe
        assert_eq!(Gender::from("male"), Gender::Undefined);
        assert_eq!(Gender::from(""), Gender::Undefined);
    }

    #[test]
    fn test_gender_deserializes_unknown_as_undefined() {
        let gender: Gender = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!(gender, Gender::Undefined);

        let gender: Gender = serde_json::from_str("\"Female\"").unwrap();
        assert_eq!(gender, Gender::Female);
    }

    #[test]
    fn test_assign_new_id() {
        let mut user = sample_user();
        assert!(!user.has_identity());

        let first = user.assign_new_id();
        assert!(user.has_identity());
        assert_eq!(user.id, first);

        let second = user.assign_new_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_user_response_hides_password() {
        let user = sample_user();
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["gender"], "Male");
        assert_eq!(json["date_of_birth"], "1998-01-01");
    }

    #[test]
    fn test_user_response_omits_undefined_gender() {
        let mut user = sample_user();
        user.gender = Gender::Undefined;
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(json.get("gender").is_none());
    }
}
