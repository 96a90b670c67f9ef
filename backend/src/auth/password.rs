//! Password hashing with Argon2id in PHC string format.

use argon2::{
    Argon2,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;

/// Failures raised while hashing or verifying a password.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Hashing failed; indicates a parameter or entropy problem.
    #[error("password hashing failed: {message}")]
    Hash {
        /// Hasher-provided description.
        message: String,
    },
    /// Stored hash is not a parseable PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Hash a clear-text password into a self-describing PHC string.
///
/// Uses the `argon2` crate's default parameters; the salt travels inside
/// the returned string, so verification needs no extra state.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hashed| hashed.to_string())
        .map_err(|err| PasswordError::Hash {
            message: err.to_string(),
        })
}

/// Check a clear-text password against a stored PHC string.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
pub fn verify(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(_) => Err(PasswordError::MalformedHash),
    }
}
