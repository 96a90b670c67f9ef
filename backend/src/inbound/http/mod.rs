//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod categories;
pub mod entries;
pub mod error;
pub mod state;
pub mod status;
pub mod users;

pub use error::ErrorBody;
pub use state::HttpState;
