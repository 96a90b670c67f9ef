//! Domain ports for the backing store.
//!
//! The relational mechanics live behind these traits; the domain only
//! states the access-control predicates the adapters' rows must satisfy.
//! Adapters map their failures into [`PersistenceError`] variants instead
//! of leaking backend-specific errors.

use async_trait::async_trait;
use thiserror::Error;

use super::{Category, CategoryId, EmailAddress, Entry, EntryId, Error, User, UserId};

/// Failures surfaced by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A uniqueness rule was violated, e.g. a duplicate login email.
    #[error("store conflict: {message}")]
    Conflict {
        /// Adapter-provided description of the violated rule.
        message: String,
    },
    /// The backing store failed or is unavailable.
    #[error("store backend failed: {message}")]
    Backend {
        /// Adapter-provided description of the failure.
        message: String,
    },
}

impl PersistenceError {
    /// Helper for uniqueness violations.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl From<PersistenceError> for Error {
    /// Storage failures are reported as opaque internal errors; the
    /// inbound adapter redacts the message before it reaches a caller.
    fn from(value: PersistenceError) -> Self {
        Error::internal(value.to_string())
    }
}

/// Credential-store port.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; fails with [`PersistenceError::Conflict`]
    /// when the email is already registered.
    async fn insert(&self, user: User) -> Result<User, PersistenceError>;

    /// Look up an account by login email.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<User>, PersistenceError>;

    /// Look up an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;
}

/// Category-table port. Rows come back unfiltered; the access policy in
/// the domain services decides what a requester may see.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new row.
    async fn insert(&self, category: Category) -> Result<Category, PersistenceError>;

    /// Fetch a row regardless of its soft-delete state.
    async fn get(&self, id: &CategoryId) -> Result<Option<Category>, PersistenceError>;

    /// All rows, ordered by creation time.
    async fn list(&self) -> Result<Vec<Category>, PersistenceError>;

    /// Persist a mutated row.
    async fn save(&self, category: Category) -> Result<Category, PersistenceError>;
}

/// Entry-table port, same conventions as [`CategoryRepository`].
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert a new row.
    async fn insert(&self, entry: Entry) -> Result<Entry, PersistenceError>;

    /// Fetch a row regardless of its soft-delete state.
    async fn get(&self, id: &EntryId) -> Result<Option<Entry>, PersistenceError>;

    /// All rows, ordered by creation time.
    async fn list(&self) -> Result<Vec<Entry>, PersistenceError>;

    /// Persist a mutated row.
    async fn save(&self, entry: Entry) -> Result<Entry, PersistenceError>;
}
