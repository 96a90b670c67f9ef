//! Domain types, access policy, and store ports.
//!
//! Everything here is transport agnostic: inbound adapters translate
//! [`Error`] into HTTP responses and outbound adapters implement the
//! [`ports`] traits. The access-control rules of the system live in
//! [`policy`] and the two services, not in route handlers.

pub mod category;
pub mod category_service;
pub mod entry;
pub mod entry_service;
pub mod error;
pub mod policy;
pub mod ports;
pub mod role;
pub mod user;

pub use self::category::{Category, CategoryDraft, CategoryId, CategoryPatch};
pub use self::category_service::CategoryService;
pub use self::entry::{Entry, EntryDraft, EntryId, EntryPatch};
pub use self::entry_service::{EntryListing, EntryQuery, EntryService};
pub use self::error::{Error, ErrorCode};
pub use self::role::Role;
pub use self::user::{EmailAddress, EmailValidationError, Identity, User, UserId};

/// Convenient result alias for domain and adapter code.
pub type ApiResult<T> = Result<T, Error>;
