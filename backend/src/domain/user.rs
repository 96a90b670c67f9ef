//! User records and the identity embedded in bearer tokens.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Role;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised when constructing an [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailValidationError {
    /// Address was missing or blank once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// Address does not look like `local@domain.tld`.
    #[error("email must be a valid address")]
    Malformed,
}

/// Validated, trimmed email address.
///
/// The check is deliberately shallow (`local@domain.tld` shape, no
/// whitespace); deliverability is not this system's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address from raw input.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new(" a@b.com ").expect("valid address");
    /// assert_eq!(email.as_str(), "a@b.com");
    /// assert!(EmailAddress::new("not-an-email").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmailValidationError::Malformed);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(EmailValidationError::Malformed);
        };
        let domain_ok = domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty());
        if local.is_empty() || !domain_ok || domain.contains('@') {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential-store record for one account.
///
/// `password_hash` is a PHC string produced by [`crate::auth::password`];
/// the clear-text password never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier, also the token subject.
    pub id: UserId,
    /// Unique login address.
    pub email: EmailAddress,
    /// Argon2 PHC hash of the password.
    pub password_hash: String,
    /// Role stamped into issued tokens.
    pub role: Role,
    /// Soft-delete flag; inactive accounts cannot be looked up.
    pub active: bool,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a fresh active record with server-assigned id and timestamp.
    pub fn create(email: EmailAddress, password_hash: String, role: Role) -> Self {
        Self {
            id: UserId::random(),
            email,
            password_hash,
            role,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Identity recovered from a verified bearer token.
///
/// Carries exactly what the token encodes: subject id and role. The role is
/// NOT re-fetched from the credential store on each request, so a role
/// change only takes effect when a new token is issued. That staleness is a
/// documented design constraint, not an oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Token subject.
    pub id: UserId,
    /// Role at issuance time.
    pub role: Role,
}

impl Identity {
    /// Construct an identity from its parts.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@b.com")]
    #[case("first.last@example.co.uk")]
    #[case("  padded@domain.org  ")]
    fn accepts_reasonable_addresses(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid address");
        assert_eq!(email.as_str(), raw.trim());
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("plain", EmailValidationError::Malformed)]
    #[case("@b.com", EmailValidationError::Malformed)]
    #[case("a@", EmailValidationError::Malformed)]
    #[case("a@nodot", EmailValidationError::Malformed)]
    #[case("a@.com", EmailValidationError::Malformed)]
    #[case("a b@c.com", EmailValidationError::Malformed)]
    #[case("a@b@c.com", EmailValidationError::Malformed)]
    fn rejects_bad_addresses(#[case] raw: &str, #[case] expected: EmailValidationError) {
        assert_eq!(EmailAddress::new(raw).expect_err("must fail"), expected);
    }

    #[rstest]
    fn create_stamps_server_fields() {
        let email = EmailAddress::new("a@b.com").expect("valid address");
        let user = User::create(email, "$argon2id$stub".to_owned(), Role::User);
        assert!(user.active);
        assert_eq!(user.role, Role::User);
    }

    #[rstest]
    fn user_id_round_trips_through_string() {
        let id = UserId::random();
        let parsed = UserId::parse(&id.to_string()).expect("canonical form parses");
        assert_eq!(parsed, id);
    }
}
