//! In-memory store adapter.
//!
//! A single [`MemoryStore`] implements all three repository ports over
//! `RwLock`-guarded maps, so one instance can back the whole service in
//! tests and single-process deployments. Lock poisoning is reported as a
//! backend failure rather than a panic.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CategoryRepository, EntryRepository, PersistenceError, UserRepository,
};
use crate::domain::{Category, CategoryId, EmailAddress, Entry, EntryId, User, UserId};

const POISONED: &str = "store lock poisoned";

/// Process-local store backing every repository port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    categories: RwLock<HashMap<Uuid, Category>>,
    entries: RwLock<HashMap<Uuid, Entry>>,
}

fn sorted_by_creation<T>(
    mut rows: Vec<T>,
    created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    rows.sort_by_key(created_at);
    rows
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: User) -> Result<User, PersistenceError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(PersistenceError::conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }
        users.insert(*user.id.as_uuid(), user.clone());
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, PersistenceError> {
        let users = self
            .users
            .read()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        let users = self
            .users
            .read()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        Ok(users.get(id.as_uuid()).cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert(&self, category: Category) -> Result<Category, PersistenceError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        categories.insert(*category.id.as_uuid(), category.clone());
        Ok(category)
    }

    async fn get(&self, id: &CategoryId) -> Result<Option<Category>, PersistenceError> {
        let categories = self
            .categories
            .read()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        Ok(categories.get(id.as_uuid()).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, PersistenceError> {
        let categories = self
            .categories
            .read()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        Ok(sorted_by_creation(
            categories.values().cloned().collect(),
            |row| row.created_at,
        ))
    }

    async fn save(&self, category: Category) -> Result<Category, PersistenceError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        categories.insert(*category.id.as_uuid(), category.clone());
        Ok(category)
    }
}

#[async_trait]
impl EntryRepository for MemoryStore {
    async fn insert(&self, entry: Entry) -> Result<Entry, PersistenceError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        entries.insert(*entry.id.as_uuid(), entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: &EntryId) -> Result<Option<Entry>, PersistenceError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        Ok(entries.get(id.as_uuid()).cloned())
    }

    async fn list(&self) -> Result<Vec<Entry>, PersistenceError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        Ok(sorted_by_creation(
            entries.values().cloned().collect(),
            |row| row.created_at,
        ))
    }

    async fn save(&self, entry: Entry) -> Result<Entry, PersistenceError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PersistenceError::backend(POISONED))?;
        entries.insert(*entry.id.as_uuid(), entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use rstest::rstest;

    fn user(email: &str) -> User {
        User::create(
            EmailAddress::new(email).expect("valid address"),
            "$argon2id$stub".to_owned(),
            Role::User,
        )
    }

    #[actix_rt::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::default();
        UserRepository::insert(&store, user("a@b.com"))
            .await
            .expect("first insert");
        let err = UserRepository::insert(&store, user("a@b.com"))
            .await
            .expect_err("second insert must fail");
        assert!(matches!(err, PersistenceError::Conflict { .. }));
    }

    #[actix_rt::test]
    async fn find_by_email_matches_exactly() {
        let store = MemoryStore::default();
        let stored = UserRepository::insert(&store, user("a@b.com"))
            .await
            .expect("insert");
        let found = store
            .find_by_email(&EmailAddress::new("a@b.com").expect("valid address"))
            .await
            .expect("lookup");
        assert_eq!(found, Some(stored));
        let missing = store
            .find_by_email(&EmailAddress::new("other@b.com").expect("valid address"))
            .await
            .expect("lookup");
        assert_eq!(missing, None);
    }

    #[rstest]
    fn listings_come_back_in_creation_order() {
        let rows = vec![
            ("b", chrono::Utc::now()),
            ("a", chrono::Utc::now() - chrono::Duration::seconds(10)),
            ("c", chrono::Utc::now() + chrono::Duration::seconds(10)),
        ];
        let sorted = sorted_by_creation(rows, |row| row.1);
        let names: Vec<&str> = sorted.iter().map(|row| row.0).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
