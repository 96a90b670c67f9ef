//! Entry use-cases behind the central access policy.
//!
//! The original system's entry routes drifted between ownership-scoped and
//! unscoped variants; concentrating every flow here makes the
//! `created_by` scope structural rather than per-route discipline.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::ports::{CategoryRepository, EntryRepository};
use super::{CategoryId, Entry, EntryDraft, EntryId, EntryPatch, Error, Identity, policy};

const ENTRY_NOT_FOUND: &str = "Entry not found";
const UNKNOWN_CATEGORY: &str = "Unknown category";

/// Filters accepted by the list operation.
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    /// Restrict to entries referencing this category (raw path form; an
    /// unparseable id simply matches no rows).
    pub category_id: Option<String>,
    /// Group the listing by category display name.
    pub sort_by_category: bool,
}

/// Result of a list operation: visible rows, flat or grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryListing {
    /// Creation-ordered rows.
    Flat(Vec<Entry>),
    /// Rows bucketed under category names, with dangling references
    /// collected under [`policy::UNCATEGORIZED`].
    Grouped(BTreeMap<String, Vec<Entry>>),
}

impl EntryListing {
    /// Number of visible rows in the listing.
    pub fn total(&self) -> usize {
        match self {
            Self::Flat(items) => items.len(),
            Self::Grouped(groups) => groups.values().map(Vec::len).sum(),
        }
    }
}

/// Entry CRUD flows shared by every entry route.
#[derive(Clone)]
pub struct EntryService {
    entries: Arc<dyn EntryRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl EntryService {
    /// Construct the service over the store ports.
    pub fn new(entries: Arc<dyn EntryRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            entries,
            categories,
        }
    }

    /// Rows visible to the requester, optionally filtered and grouped.
    ///
    /// The reported total always counts requester-visible rows only; the
    /// global row count never leaks to a non-owner.
    pub async fn list(
        &self,
        requester: &Identity,
        query: EntryQuery,
    ) -> Result<EntryListing, Error> {
        let filter = match query.category_id.as_deref() {
            Some(raw) => match CategoryId::parse(raw) {
                Ok(id) => Some(id),
                // Not a real id, so it cannot match any row.
                Err(_) => return Ok(EntryListing::Flat(Vec::new())),
            },
            None => None,
        };

        let rows: Vec<Entry> = self
            .entries
            .list()
            .await?
            .into_iter()
            .filter(|row| policy::visible(row, requester))
            .filter(|row| filter.is_none_or(|wanted| row.category_id == wanted))
            .collect();

        if !query.sort_by_category {
            return Ok(EntryListing::Flat(rows));
        }

        // Soft-deleted categories still resolve their name: entries keep
        // referencing them, there is no cascade.
        let names: HashMap<CategoryId, String> = self
            .categories
            .list()
            .await?
            .into_iter()
            .map(|category| (category.id, category.name))
            .collect();
        let grouped =
            policy::group_by_category(rows, |entry| names.get(&entry.category_id).cloned());
        Ok(EntryListing::Grouped(grouped))
    }

    /// Materialise and store a new row owned by the requester.
    ///
    /// The referenced category must be visible at creation time.
    pub async fn create(&self, requester: &Identity, draft: EntryDraft) -> Result<Entry, Error> {
        self.require_category(requester, draft.category_id()).await?;
        Ok(self.entries.insert(draft.into_entry(requester.id)).await?)
    }

    /// Fetch one row visible to the requester.
    pub async fn get(&self, requester: &Identity, id: &str) -> Result<Entry, Error> {
        let id = parse_id(id)?;
        let row = self.entries.get(&id).await?;
        policy::require_visible(row, requester, ENTRY_NOT_FOUND)
    }

    /// Apply a partial update to a row visible to the requester.
    pub async fn update(
        &self,
        requester: &Identity,
        id: &str,
        patch: EntryPatch,
    ) -> Result<Entry, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("No valid fields to update"));
        }
        if let Some(category_id) = patch.category_id() {
            self.require_category(requester, category_id).await?;
        }
        let mut row = self.get(requester, id).await?;
        patch.apply(&mut row);
        Ok(self.entries.save(row).await?)
    }

    /// Soft-delete a row visible to the requester.
    pub async fn delete(&self, requester: &Identity, id: &str) -> Result<Entry, Error> {
        let mut row = self.get(requester, id).await?;
        row.active = false;
        Ok(self.entries.save(row).await?)
    }

    async fn require_category(
        &self,
        requester: &Identity,
        category_id: CategoryId,
    ) -> Result<(), Error> {
        let category = self.categories.get(&category_id).await?;
        match category {
            Some(found) if policy::visible(&found, requester) => Ok(()),
            _ => Err(Error::invalid_request(UNKNOWN_CATEGORY)),
        }
    }
}

fn parse_id(raw: &str) -> Result<EntryId, Error> {
    EntryId::parse(raw).map_err(|_| Error::not_found(ENTRY_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryDraft, CategoryService, ErrorCode, Role, UserId};
    use crate::outbound::persistence::MemoryStore;

    struct Fixture {
        entries: EntryService,
        categories: CategoryService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::default());
        Fixture {
            entries: EntryService::new(store.clone(), store.clone()),
            categories: CategoryService::new(store),
        }
    }

    fn user() -> Identity {
        Identity::new(UserId::random(), Role::User)
    }

    async fn seed_category(fixture: &Fixture, name: &str) -> CategoryId {
        fixture
            .categories
            .create(CategoryDraft::new(name).expect("valid draft"))
            .await
            .expect("create category")
            .id
    }

    fn draft(name: &str, category: CategoryId) -> EntryDraft {
        EntryDraft::new(name, category, None).expect("valid draft")
    }

    #[actix_rt::test]
    async fn create_requires_visible_category() {
        let fixture = fixture();
        let err = fixture
            .entries
            .create(&user(), draft("Dune", CategoryId::random()))
            .await
            .expect_err("dangling category");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Unknown category");
    }

    #[actix_rt::test]
    async fn foreign_entries_read_as_missing() {
        let fixture = fixture();
        let owner = user();
        let stranger = user();
        let books = seed_category(&fixture, "Books").await;
        let created = fixture
            .entries
            .create(&owner, draft("Dune", books))
            .await
            .expect("create");

        let err = fixture
            .entries
            .get(&stranger, &created.id.to_string())
            .await
            .expect_err("not the owner");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let listing = fixture
            .entries
            .list(&stranger, EntryQuery::default())
            .await
            .expect("list");
        assert_eq!(listing.total(), 0);
    }

    #[actix_rt::test]
    async fn list_filters_by_category_and_visibility() {
        let fixture = fixture();
        let owner = user();
        let books = seed_category(&fixture, "Books").await;
        let films = seed_category(&fixture, "Films").await;
        fixture
            .entries
            .create(&owner, draft("Dune", books))
            .await
            .expect("create");
        let film = fixture
            .entries
            .create(&owner, draft("Alien", films))
            .await
            .expect("create");
        fixture
            .entries
            .delete(&owner, &film.id.to_string())
            .await
            .expect("delete");

        let all = fixture
            .entries
            .list(&owner, EntryQuery::default())
            .await
            .expect("list");
        assert_eq!(all.total(), 1);

        let filtered = fixture
            .entries
            .list(
                &owner,
                EntryQuery {
                    category_id: Some(books.to_string()),
                    sort_by_category: false,
                },
            )
            .await
            .expect("list");
        assert_eq!(filtered.total(), 1);

        let bogus = fixture
            .entries
            .list(
                &owner,
                EntryQuery {
                    category_id: Some("bogus".to_owned()),
                    sort_by_category: false,
                },
            )
            .await
            .expect("list");
        assert_eq!(bogus.total(), 0);
    }

    #[actix_rt::test]
    async fn grouped_listing_survives_category_soft_delete() {
        let fixture = fixture();
        let owner = user();
        let books = seed_category(&fixture, "Books").await;
        fixture
            .entries
            .create(&owner, draft("Dune", books))
            .await
            .expect("create");
        fixture
            .categories
            .delete(&owner, &books.to_string())
            .await
            .expect("delete category");

        let listing = fixture
            .entries
            .list(
                &owner,
                EntryQuery {
                    category_id: None,
                    sort_by_category: true,
                },
            )
            .await
            .expect("list");
        let EntryListing::Grouped(groups) = listing else {
            panic!("expected grouped listing");
        };
        // No cascade: the entry stays readable under the dead category's
        // name rather than moving to the fallback bucket.
        assert_eq!(groups.get("Books").map(Vec::len), Some(1));
    }

    #[actix_rt::test]
    async fn update_rejects_retarget_to_invisible_category() {
        let fixture = fixture();
        let owner = user();
        let books = seed_category(&fixture, "Books").await;
        let films = seed_category(&fixture, "Films").await;
        let created = fixture
            .entries
            .create(&owner, draft("Dune", books))
            .await
            .expect("create");
        fixture
            .categories
            .delete(&owner, &films.to_string())
            .await
            .expect("delete category");

        let patch = EntryPatch::new(None, Some(films), None).expect("valid patch");
        let err = fixture
            .entries
            .update(&owner, &created.id.to_string(), patch)
            .await
            .expect_err("deleted target");
        assert_eq!(err.message(), "Unknown category");
    }

    #[actix_rt::test]
    async fn delete_is_one_way_and_then_missing() {
        let fixture = fixture();
        let owner = user();
        let books = seed_category(&fixture, "Books").await;
        let created = fixture
            .entries
            .create(&owner, draft("Dune", books))
            .await
            .expect("create");
        let id = created.id.to_string();

        let deleted = fixture.entries.delete(&owner, &id).await.expect("delete");
        assert!(!deleted.active);
        let err = fixture
            .entries
            .delete(&owner, &id)
            .await
            .expect_err("already deleted");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
