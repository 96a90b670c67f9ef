//! Authentication primitives: tokens, password hashing, and validated
//! credential payloads.

pub mod credentials;
pub mod password;
pub mod token;

pub use credentials::{CredentialsError, Login, MIN_PASSWORD_LEN, Registration};
pub use token::{TokenError, TokenLifetime, TokenService};
