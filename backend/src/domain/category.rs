//! Category aggregate: a globally shared, soft-deletable label.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable category identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
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

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised by [`CategoryDraft`] and [`CategoryPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryValidationError {
    /// Name was missing or blank once trimmed.
    #[error("category name must not be empty")]
    EmptyName,
}

/// Category row. No owner field: any sufficiently-privileged identity may
/// read or mutate any category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Stable identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Soft-delete flag; inactive rows are invisible to every read.
    pub active: bool,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    name: String,
}

impl CategoryDraft {
    /// Validate a raw name into a draft.
    pub fn new(name: &str) -> Result<Self, CategoryValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
        })
    }

    /// Materialise the draft into an active row with server-assigned
    /// id and timestamp.
    pub fn into_category(self) -> Category {
        Category {
            id: CategoryId::random(),
            name: self.name,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Validated partial update for a category.
///
/// `active` is deliberately absent: only the delete operation may flip it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    name: Option<String>,
}

impl CategoryPatch {
    /// Validate an optional raw name into a patch.
    pub fn new(name: Option<&str>) -> Result<Self, CategoryValidationError> {
        let name = match name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(CategoryValidationError::EmptyName);
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };
        Ok(Self { name })
    }

    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// Apply the patch to an existing row.
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
    }
}
