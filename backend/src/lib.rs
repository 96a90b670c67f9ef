//! Backend library modules.
//!
//! Hexagonal layout: `domain` holds the business rules behind ports,
//! `inbound` adapts HTTP onto them, `outbound` implements the store
//! ports, and `server` wires the pieces into an Actix application.

pub mod auth;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
