//! Validated registration and login payloads.
//!
//! Raw request bodies are deserialized at the HTTP boundary and then
//! promoted into these types, so handlers and services only ever see
//! credentials that have already passed shape checks. Clear-text
//! passwords are wrapped in [`Zeroizing`] so they are wiped when the
//! request finishes.

use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, EmailValidationError};

/// Minimum accepted password length, in bytes.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validation failures for credential payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    /// Email failed address validation.
    #[error(transparent)]
    Email(#[from] EmailValidationError),
    /// Password missing or shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Validated credentials for account creation.
#[derive(Debug)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw input into a registration payload.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = EmailAddress::new(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validated address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Clear-text password, pending hashing.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Validated credentials for login.
///
/// Login applies only the email shape check: a too-short password cannot
/// match any stored hash, so it falls through to the same rejection as a
/// wrong password rather than leaking which rule failed.
#[derive(Debug)]
pub struct Login {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Login {
    /// Validate raw input into a login payload.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = EmailAddress::new(email)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validated address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Clear-text password, pending verification.
    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn registration_accepts_valid_input() {
        let reg = Registration::new("a@b.com", "longenough").expect("valid");
        assert_eq!(reg.email().as_str(), "a@b.com");
        assert_eq!(reg.password(), "longenough");
    }

    #[rstest]
    #[case("short")]
    #[case("")]
    #[case("1234567")]
    fn registration_rejects_short_passwords(#[case] password: &str) {
        assert_eq!(
            Registration::new("a@b.com", password).expect_err("must fail"),
            CredentialsError::PasswordTooShort
        );
    }

    #[rstest]
    fn registration_rejects_bad_email() {
        assert!(matches!(
            Registration::new("nope", "longenough").expect_err("must fail"),
            CredentialsError::Email(_)
        ));
    }

    #[rstest]
    fn login_skips_the_length_rule() {
        let login = Login::new("a@b.com", "x").expect("valid");
        assert_eq!(login.password(), "x");
    }
}
