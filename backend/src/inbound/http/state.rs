//! Shared HTTP adapter state.
//!
//! Handlers take this via `actix_web::web::Data`, so they depend only on
//! domain services and ports and stay testable without a live server.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::domain::ports::UserRepository;
use crate::domain::{CategoryService, EntryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential store, used by registration, login, and profile lookup.
    pub users: Arc<dyn UserRepository>,
    /// Category use-cases.
    pub categories: CategoryService,
    /// Entry use-cases.
    pub entries: EntryService,
    /// Token issuance and verification.
    pub tokens: Arc<TokenService>,
}
