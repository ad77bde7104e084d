//! Password hashing with Argon2id.
//!
//! Hashes are stored in PHC string format so parameters and salt travel with
//! the digest.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::RngCore;

/// Errors raised while hashing or parsing a stored hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Argon2 rejected the input or salt.
    #[error("failed to hash password: {0}")]
    Hash(String),
    /// A stored value is not a PHC string.
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

/// PHC-formatted Argon2 password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordHashError> {
        let mut salt_bytes = [0_u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHashError::Hash(err.to_string()))?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hash(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a hash loaded from storage, checking that it parses.
    pub fn from_stored(raw: impl Into<String>) -> Result<Self, PasswordHashError> {
        let stored: String = raw.into();
        PhcHash::new(&stored).map_err(|err| PasswordHashError::Malformed(err.to_string()))?;
        Ok(Self(stored))
    }

    /// Check a plaintext password against this hash.
    pub fn verify(&self, password: &str) -> bool {
        PhcHash::new(&self.0)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
