//! Bearer-token issuance and verification.
//!
//! Pure computation over an HMAC secret: no store lookups at verify time,
//! so a role change only propagates when a new token is issued. Lifetime
//! is a policy object rather than a hardcoded choice; the observed system
//! shipped unbounded tokens and [`TokenLifetime::Unbounded`] preserves
//! that default while keeping expiry one configuration flip away.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Identity, Role, UserId};

/// Failures raised by [`TokenService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token is malformed, unsigned, or signed with a different secret.
    #[error("invalid token")]
    Invalid,
    /// Token carries an `exp` claim in the past (bounded lifetimes only).
    #[error("token expired")]
    Expired,
    /// Token subject is not a well-formed identifier.
    #[error("invalid token subject")]
    InvalidSubject,
    /// Signing failed; indicates a broken key, not caller error.
    #[error("token issuance failed: {message}")]
    Issuance {
        /// Encoder-provided description.
        message: String,
    },
}

/// Lifetime policy applied at issuance and enforced at verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifetime {
    /// No `exp` claim; tokens outlive everything except secret rotation.
    Unbounded,
    /// `exp = iat + max_age`, checked (with standard leeway) on verify.
    MaxAge(Duration),
}

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject: user id.
    sub: String,
    /// Role at issuance time.
    role: Role,
    /// Issued at (unix timestamp).
    iat: i64,
    /// Expiration (unix timestamp); absent under unbounded lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// HS256 token service shared by the login handler (issue) and the
/// authentication guard (verify).
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: TokenLifetime,
}

impl TokenService {
    /// Create a service over an HMAC secret and a lifetime policy.
    pub fn new(secret: &str, lifetime: TokenLifetime) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if matches!(lifetime, TokenLifetime::Unbounded) {
            validation.required_spec_claims.clear();
            validation.validate_exp = false;
        }
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        }
    }

    /// Issue a signed token embedding the identity.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let iat = chrono::Utc::now().timestamp();
        let exp = match self.lifetime {
            TokenLifetime::Unbounded => None,
            TokenLifetime::MaxAge(max_age) => {
                let secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
                Some(iat.saturating_add(secs))
            }
        };
        let claims = Claims {
            sub: identity.id.to_string(),
            role: identity.role,
            iat,
            exp,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key).map_err(|err| {
            TokenError::Issuance {
                message: err.to_string(),
            }
        })
    }

    /// Verify a token and recover the identity it embeds.
    ///
    /// Pure signature check plus claim decoding; never performs I/O.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;
        let id = UserId::parse(&data.claims.sub).map_err(|_| TokenError::InvalidSubject)?;
        Ok(Identity::new(id, data.claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SECRET: &str = "unit-test-secret-0123456789abcdef";

    fn identity() -> Identity {
        Identity::new(UserId::random(), Role::Editor)
    }

    #[rstest]
    #[case(TokenLifetime::Unbounded)]
    #[case(TokenLifetime::MaxAge(Duration::from_secs(3600)))]
    fn issue_then_verify_recovers_identity(#[case] lifetime: TokenLifetime) {
        let service = TokenService::new(SECRET, lifetime);
        let identity = identity();
        let token = service.issue(&identity).expect("issue");
        let recovered = service.verify(&token).expect("verify");
        assert_eq!(recovered, identity);
    }

    #[rstest]
    fn foreign_secret_is_rejected() {
        let issuer =
            TokenService::new("secret-a-secret-a-secret-a-secret", TokenLifetime::Unbounded);
        let verifier =
            TokenService::new("secret-b-secret-b-secret-b-secret", TokenLifetime::Unbounded);
        let token = issuer.issue(&identity()).expect("issue");
        assert_eq!(verifier.verify(&token), Err(TokenError::Invalid));
    }

    #[rstest]
    #[case("")]
    #[case("garbage")]
    #[case("a.b.c")]
    fn malformed_tokens_are_rejected(#[case] token: &str) {
        let service = TokenService::new(SECRET, TokenLifetime::Unbounded);
        assert_eq!(service.verify(token), Err(TokenError::Invalid));
    }

    #[rstest]
    fn expired_tokens_are_rejected_under_bounded_lifetime() {
        // Issued already expired, beyond the default leeway.
        let stale = TokenService::new(SECRET, TokenLifetime::MaxAge(Duration::ZERO));
        let token = {
            let iat = chrono::Utc::now().timestamp() - 300;
            let claims = Claims {
                sub: UserId::random().to_string(),
                role: Role::User,
                iat,
                exp: Some(iat),
            };
            jsonwebtoken::encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(SECRET.as_bytes()),
            )
            .expect("encode")
        };
        assert_eq!(stale.verify(&token), Err(TokenError::Expired));
    }

    #[rstest]
    fn unbounded_verifier_accepts_expiryless_tokens() {
        let service = TokenService::new(SECRET, TokenLifetime::Unbounded);
        let token = service.issue(&identity()).expect("issue");
        // The encoded claims simply omit `exp`.
        assert!(service.verify(&token).is_ok());
    }
}
