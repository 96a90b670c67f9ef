//! Entry aggregate: a creator-owned note referencing a category.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{CategoryId, UserId};

/// Stable entry identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
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

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised by [`EntryDraft`] and [`EntryPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryValidationError {
    /// Name was missing or blank once trimmed.
    #[error("entry name must not be empty")]
    EmptyName,
    /// Description was supplied but blank once trimmed.
    #[error("entry description must not be empty when present")]
    EmptyDescription,
}

/// Entry row. Owned by its creator: visibility and mutation are scoped to
/// `created_by` on every access path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Stable identifier.
    pub id: EntryId,
    /// Display name.
    pub name: String,
    /// Referenced category. Checked to exist at creation time; the
    /// reference is kept even if that category is later soft-deleted.
    pub category_id: CategoryId,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Soft-delete flag; inactive rows are invisible to every read.
    pub active: bool,
    /// Identity that created the row; the ownership scope.
    pub created_by: UserId,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated payload for creating an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    name: String,
    category_id: CategoryId,
    description: Option<String>,
}

impl EntryDraft {
    /// Validate raw inputs into a draft.
    pub fn new(
        name: &str,
        category_id: CategoryId,
        description: Option<&str>,
    ) -> Result<Self, EntryValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EntryValidationError::EmptyName);
        }
        let description = validate_description(description)?;
        Ok(Self {
            name: name.to_owned(),
            category_id,
            description,
        })
    }

    /// Category the draft references; checked by the service before
    /// the row is materialised.
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Materialise the draft into an active row owned by `created_by`.
    pub fn into_entry(self, created_by: UserId) -> Entry {
        Entry {
            id: EntryId::random(),
            name: self.name,
            category_id: self.category_id,
            description: self.description,
            active: true,
            created_by,
            created_at: Utc::now(),
        }
    }
}

/// Validated partial update for an entry.
///
/// `description` distinguishes "leave untouched" (`None`) from "clear"
/// (`Some(None)`). `active` and `created_by` are deliberately absent:
/// the delete operation owns the former and ownership never transfers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    name: Option<String>,
    category_id: Option<CategoryId>,
    description: Option<Option<String>>,
}

impl EntryPatch {
    /// Validate optional raw inputs into a patch.
    pub fn new(
        name: Option<&str>,
        category_id: Option<CategoryId>,
        description: Option<Option<&str>>,
    ) -> Result<Self, EntryValidationError> {
        let name = match name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(EntryValidationError::EmptyName);
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };
        let description = match description {
            Some(inner) => Some(validate_description(inner)?),
            None => None,
        };
        Ok(Self {
            name,
            category_id,
            description,
        })
    }

    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category_id.is_none() && self.description.is_none()
    }

    /// Category the patch retargets to, when present.
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    /// Apply the patch to an existing row.
    pub fn apply(self, entry: &mut Entry) {
        if let Some(name) = self.name {
            entry.name = name;
        }
        if let Some(category_id) = self.category_id {
            entry.category_id = category_id;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
    }
}

fn validate_description(raw: Option<&str>) -> Result<Option<String>, EntryValidationError> {
    match raw {
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(EntryValidationError::EmptyDescription);
            }
            Ok(Some(trimmed.to_owned()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn category() -> CategoryId {
        CategoryId::random()
    }

    #[rstest]
    fn draft_materialises_owned_row() {
        let owner = UserId::random();
        let draft =
            EntryDraft::new(" Dune ", category(), Some("sci-fi classic")).expect("valid draft");
        let entry = draft.into_entry(owner);
        assert_eq!(entry.name, "Dune");
        assert_eq!(entry.created_by, owner);
        assert!(entry.active);
        assert_eq!(entry.description.as_deref(), Some("sci-fi classic"));
    }

    #[rstest]
    fn draft_allows_missing_description() {
        let draft = EntryDraft::new("Dune", category(), None).expect("valid draft");
        let entry = draft.into_entry(UserId::random());
        assert_eq!(entry.description, None);
    }

    #[rstest]
    fn draft_rejects_blank_name_and_description() {
        assert_eq!(
            EntryDraft::new("  ", category(), None).expect_err("blank name"),
            EntryValidationError::EmptyName
        );
        assert_eq!(
            EntryDraft::new("Dune", category(), Some("  ")).expect_err("blank description"),
            EntryValidationError::EmptyDescription
        );
    }

    #[rstest]
    fn empty_patch_is_detected() {
        let patch = EntryPatch::new(None, None, None).expect("valid patch");
        assert!(patch.is_empty());
    }

    #[rstest]
    fn patch_clears_description_explicitly() {
        let mut entry = EntryDraft::new("Dune", category(), Some("sci-fi"))
            .expect("valid draft")
            .into_entry(UserId::random());
        let patch = EntryPatch::new(None, None, Some(None)).expect("valid patch");
        assert!(!patch.is_empty());
        patch.apply(&mut entry);
        assert_eq!(entry.description, None);
        assert_eq!(entry.name, "Dune");
    }

    #[rstest]
    fn patch_never_touches_ownership_or_liveness() {
        let owner = UserId::random();
        let mut entry = EntryDraft::new("Dune", category(), None)
            .expect("valid draft")
            .into_entry(owner);
        let retarget = category();
        let patch = EntryPatch::new(Some("Arrakis"), Some(retarget), None).expect("valid patch");
        patch.apply(&mut entry);
        assert_eq!(entry.created_by, owner);
        assert!(entry.active);
        assert_eq!(entry.category_id, retarget);
    }
}
