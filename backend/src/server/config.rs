//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::auth::TokenLifetime;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const MIN_SECRET_LEN: usize = 32;

/// Failures raised while assembling configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `BIND_ADDR` is not a parseable socket address.
    #[error("invalid BIND_ADDR: {value}")]
    InvalidBindAddr {
        /// Offending value.
        value: String,
    },
    /// `JWT_SECRET` is missing and ephemeral secrets are not allowed.
    #[error("JWT_SECRET is required outside debug builds; set JWT_ALLOW_EPHEMERAL=1 to override")]
    MissingSecret,
    /// `JWT_SECRET` is too short to act as an HMAC key.
    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} characters")]
    WeakSecret,
    /// `TOKEN_MAX_AGE_SECS` is not a positive integer.
    #[error("invalid TOKEN_MAX_AGE_SECS: {value}")]
    InvalidTokenMaxAge {
        /// Offending value.
        value: String,
    },
}

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: String,
    pub(crate) token_lifetime: TokenLifetime,
    pub(crate) api_key: Option<String>,
}

impl ServerConfig {
    /// Construct a configuration from explicit parts.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: String, token_lifetime: TokenLifetime) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            token_lifetime,
            api_key: None,
        }
    }

    /// Attach a deployment API key enforced by the perimeter middleware.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Assemble configuration from environment variables.
    ///
    /// Reads `BIND_ADDR`, `JWT_SECRET`, `TOKEN_MAX_AGE_SECS`, and `API_KEY`.
    /// The signing secret is mandatory in release builds; debug builds (or
    /// `JWT_ALLOW_EPHEMERAL=1`) fall back to a generated secret so local
    /// runs work without setup, at the cost of invalidating tokens on
    /// restart.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr =
            bind_addr
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr { value: bind_addr })?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => {
                if secret.len() < MIN_SECRET_LEN {
                    return Err(ConfigError::WeakSecret);
                }
                secret
            }
            Err(_) => {
                let allow_dev = env::var("JWT_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!("using ephemeral signing secret (dev only); tokens die with the process");
                    format!("{}{}", Uuid::new_v4(), Uuid::new_v4())
                } else {
                    return Err(ConfigError::MissingSecret);
                }
            }
        };

        let token_lifetime = match env::var("TOKEN_MAX_AGE_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidTokenMaxAge { value: raw })?;
                TokenLifetime::MaxAge(Duration::from_secs(secs))
            }
            Err(_) => TokenLifetime::Unbounded,
        };

        let api_key = env::var("API_KEY").ok().filter(|key| !key.is_empty());

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_lifetime,
            api_key,
        })
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Configured token lifetime policy.
    #[must_use]
    pub fn token_lifetime(&self) -> TokenLifetime {
        self.token_lifetime
    }
}
