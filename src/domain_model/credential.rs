use super::FieldError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::fmt;

pub const CREDENTIAL_MIN_LEN: usize = 6;
pub const CREDENTIAL_MAX_LEN: usize = 32;

/// Encoded access secret (Argon2 PHC string).
///
/// The directory stores and returns it untouched; only [`Credential::verify`]
/// looks inside.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validates a plain secret and encodes it.
    pub fn from_plain(plain: &str) -> Result<Self, FieldError> {
        if !Self::is_acceptable(plain) {
            return Err(FieldError::WeakCredential);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| FieldError::Credential(e.to_string()))?
            .to_string();
        Ok(Credential(hash))
    }

    /// Wraps an already encoded value, e.g. one read back from storage.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Credential(encoded.into())
    }

    pub fn encoded(&self) -> &str {
        &self.0
    }

    pub fn is_acceptable(plain: &str) -> bool {
        let len = plain.chars().count();
        (CREDENTIAL_MIN_LEN..=CREDENTIAL_MAX_LEN).contains(&len)
            && !plain.chars().any(char::is_whitespace)
            && plain.chars().any(char::is_alphabetic)
            && plain.chars().any(|c| c.is_ascii_digit())
    }

    pub fn verify(&self, plain: &str) -> Result<bool, FieldError> {
        let parsed = PasswordHash::new(&self.0)
            .map_err(|e| FieldError::Credential(format!("invalid PHC hash: {e}")))?;

        match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(FieldError::Credential(format!("verify error: {e}"))),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}
