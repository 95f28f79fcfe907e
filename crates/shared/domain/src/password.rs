//! Password value object.
//!
//! Plaintext passwords never reach storage: a validated password is hashed
//! with Argon2 (random salt) when the `User` is constructed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a password error if the plain text is shorter than
    /// [`MIN_PASSWORD_LENGTH`] or hashing fails.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::password(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "Passw0rd!";
        let password = Password::new(plain).unwrap();

        assert_ne!(password.as_str(), plain);
        assert!(password.verify(plain));
        assert!(!password.verify("Wr0ngPass!"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "Secr3t#Value";
        let hash = Password::new(plain).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "Sam3Pass!word";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_password_too_short() {
        let result = Password::new("Sh0rt!");
        assert!(matches!(result, Err(DomainError::Password(_))));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("Passw0rd!").unwrap();
        let rendered = format!("{:?}", password);

        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(password.as_str()));
    }
}
