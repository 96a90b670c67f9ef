//! Client-side session state for token-authenticated API access.
//!
//! A consumer of the REST API holds exactly one piece of authentication
//! state: the bearer token and the account snapshot returned by login.
//! [`SessionContext`] owns that state and a pluggable [`SessionStore`]
//! for persistence, so callers never format authorization headers or
//! touch storage directly. Restoring, establishing, and clearing a
//! session are the only ways the state changes.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account snapshot captured at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Stable account identifier.
    pub id: String,
    /// Login email address.
    pub email: String,
    /// Role at login time; refreshed only by logging in again.
    pub role: String,
}

/// One authenticated session: the token plus who it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Account the token belongs to.
    pub user: SessionUser,
}

/// Failures raised by session stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    /// The backing storage could not be read or written.
    #[error("session storage failed: {message}")]
    Storage {
        /// Store-provided description.
        message: String,
    },
}

impl SessionStoreError {
    /// Helper for storage failures.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Failures raised by [`SessionContext`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The store failed.
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    /// Persisted state exists but does not decode as a session.
    #[error("persisted session is corrupt: {message}")]
    Corrupt {
        /// Decoder-provided description.
        message: String,
    },
}

/// Persistence port for serialized session state.
///
/// Implementations store one opaque string; the context owns the
/// encoding. A web consumer would back this with browser storage, tests
/// use [`MemorySessionStore`].
pub trait SessionStore {
    /// Load the persisted payload, if any.
    fn load(&self) -> Result<Option<String>, SessionStoreError>;
    /// Persist a payload, replacing any previous one.
    fn save(&self, payload: &str) -> Result<(), SessionStoreError>;
    /// Remove the persisted payload.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// In-memory store; the default for tests and short-lived tools.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, SessionStoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| SessionStoreError::storage("lock poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, payload: &str) -> Result<(), SessionStoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SessionStoreError::storage("lock poisoned"))?;
        *slot = Some(payload.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SessionStoreError::storage("lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// Owner of the current session and its persistence.
pub struct SessionContext {
    store: Box<dyn SessionStore>,
    session: Option<Session>,
}

impl SessionContext {
    /// Create a context over a store, with no session loaded.
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            session: None,
        }
    }

    /// Load any persisted session into the context.
    ///
    /// A corrupt payload is cleared from the store and reported, leaving
    /// the context signed out rather than wedged.
    pub fn restore(&mut self) -> Result<Option<&Session>, SessionError> {
        let Some(payload) = self.store.load()? else {
            self.session = None;
            return Ok(None);
        };
        match serde_json::from_str::<Session>(&payload) {
            Ok(session) => {
                self.session = Some(session);
                Ok(self.session.as_ref())
            }
            Err(err) => {
                self.store.clear()?;
                self.session = None;
                Err(SessionError::Corrupt {
                    message: err.to_string(),
                })
            }
        }
    }

    /// Adopt and persist a freshly issued session.
    pub fn establish(&mut self, session: Session) -> Result<(), SessionError> {
        let payload = serde_json::to_string(&session).map_err(|err| SessionError::Corrupt {
            message: err.to_string(),
        })?;
        self.store.save(&payload)?;
        self.session = Some(session);
        Ok(())
    }

    /// Drop the session from the context and the store.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.session = None;
        Ok(())
    }

    /// The current session, if signed in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// `Authorization` header value for the current session.
    pub fn authorization_header(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|session| format!("Bearer {}", session.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> Session {
        Session {
            token: "abc.def.ghi".to_owned(),
            user: SessionUser {
                id: "00000000-0000-0000-0000-000000000001".to_owned(),
                email: "reader@example.com".to_owned(),
                role: "user".to_owned(),
            },
        }
    }

    #[rstest]
    fn establish_persists_and_restore_round_trips() {
        let store = MemorySessionStore::default();
        let mut context = SessionContext::new(store.clone());
        context.establish(sample()).expect("establish");
        assert!(context.is_authenticated());

        let mut fresh = SessionContext::new(store);
        let restored = fresh.restore().expect("restore").cloned();
        assert_eq!(restored, Some(sample()));
    }

    #[rstest]
    fn restore_with_empty_store_signs_out() {
        let mut context = SessionContext::new(MemorySessionStore::default());
        assert_eq!(context.restore().expect("restore"), None);
        assert!(!context.is_authenticated());
    }

    #[rstest]
    fn corrupt_payload_is_cleared_and_reported() {
        let store = MemorySessionStore::default();
        store.save("not json").expect("save");
        let mut context = SessionContext::new(store.clone());
        assert!(matches!(
            context.restore().expect_err("must fail"),
            SessionError::Corrupt { .. }
        ));
        assert!(!context.is_authenticated());
        assert_eq!(store.load().expect("load"), None);
    }

    #[rstest]
    fn clear_removes_both_copies() {
        let store = MemorySessionStore::default();
        let mut context = SessionContext::new(store.clone());
        context.establish(sample()).expect("establish");
        context.clear().expect("clear");
        assert!(!context.is_authenticated());
        assert_eq!(store.load().expect("load"), None);
    }

    #[rstest]
    fn authorization_header_carries_the_bearer_scheme() {
        let mut context = SessionContext::new(MemorySessionStore::default());
        assert_eq!(context.authorization_header(), None);
        context.establish(sample()).expect("establish");
        assert_eq!(
            context.authorization_header().as_deref(),
            Some("Bearer abc.def.ghi")
        );
    }
}
