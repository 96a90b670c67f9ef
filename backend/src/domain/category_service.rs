//! Category use-cases behind the central access policy.
//!
//! Handlers perform guard checks and DTO mapping only; every read and
//! mutation of category rows goes through this service so the soft-delete
//! predicate is applied identically on each route.

use std::sync::Arc;

use super::ports::CategoryRepository;
use super::{Category, CategoryDraft, CategoryId, CategoryPatch, Error, Identity, policy};

const CATEGORY_NOT_FOUND: &str = "Category not found";

/// Category CRUD flows shared by every category route.
#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Construct the service over a store port.
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Rows passing the visibility predicate, in creation order.
    pub async fn list(&self, requester: &Identity) -> Result<Vec<Category>, Error> {
        let rows = self.repo.list().await?;
        Ok(rows
            .into_iter()
            .filter(|row| policy::visible(row, requester))
            .collect())
    }

    /// Materialise and store a new active row.
    pub async fn create(&self, draft: CategoryDraft) -> Result<Category, Error> {
        Ok(self.repo.insert(draft.into_category()).await?)
    }

    /// Fetch one visible row.
    pub async fn get(&self, requester: &Identity, id: &str) -> Result<Category, Error> {
        let id = parse_id(id)?;
        let row = self.repo.get(&id).await?;
        policy::require_visible(row, requester, CATEGORY_NOT_FOUND)
    }

    /// Apply a partial update to a visible row.
    ///
    /// Rejects empty patches; `active` cannot ride in on a patch, only
    /// [`CategoryService::delete`] transitions it.
    pub async fn update(
        &self,
        requester: &Identity,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Category, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("No valid fields to update"));
        }
        let mut row = self.get(requester, id).await?;
        patch.apply(&mut row);
        Ok(self.repo.save(row).await?)
    }

    /// Soft-delete a visible row.
    ///
    /// The transition is one-way; deleting an already-invisible row
    /// reports `NotFound` like any other invisible access.
    pub async fn delete(&self, requester: &Identity, id: &str) -> Result<Category, Error> {
        let mut row = self.get(requester, id).await?;
        row.active = false;
        Ok(self.repo.save(row).await?)
    }
}

/// Map unparseable path ids to `NotFound`: a malformed id cannot name a
/// row, and nonexistence stays indistinguishable from inaccessibility.
fn parse_id(raw: &str) -> Result<CategoryId, Error> {
    CategoryId::parse(raw).map_err(|_| Error::not_found(CATEGORY_NOT_FOUND))
}
