use async_trait::async_trait;
use database::{Page, PageRequest};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserStatus};

/// Repository trait for User persistence
///
/// Every listing is ordered by id, ascending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert when `user.id` is `None`, otherwise overwrite the row with that id
    async fn save(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    async fn find_all(&self, page: PageRequest) -> UserResult<Page<User>>;

    /// Case-insensitive substring match on the name
    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
        page: PageRequest,
    ) -> UserResult<Page<User>>;

    async fn find_by_status(&self, status: UserStatus, page: PageRequest)
    -> UserResult<Page<User>>;

    /// Exact, case-sensitive email match
    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: i64) -> UserResult<bool>;

    /// Delete by the user's id; an unsaved user deletes nothing
    async fn delete(&self, user: &User) -> UserResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && u.id != except)
    }

    fn page_where<F>(&self, page: PageRequest, predicate: F) -> Page<User>
    where
        F: Fn(&User) -> bool,
    {
        let matching = self.users.values().filter(|u| predicate(u)).cloned().collect();
        Page::from_sorted(matching, page)
    }
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, mut user: User) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&user.email, user.id) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        match user.id {
            Some(id) => {
                let slot = store.users.get_mut(&id).ok_or(UserError::NotFound(id))?;
                *slot = user.clone();
                tracing::info!(user_id = id, "Updated user");
            }
            None => {
                store.last_id += 1;
                let id = store.last_id;
                user.id = Some(id);
                store.users.insert(id, user.clone());
                tracing::info!(user_id = id, "Created user");
            }
        }

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_all(&self, page: PageRequest) -> UserResult<Page<User>> {
        let store = self.store.read().await;
        Ok(store.page_where(page, |_| true))
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
        page: PageRequest,
    ) -> UserResult<Page<User>> {
        let needle = name.to_lowercase();
        let store = self.store.read().await;
        Ok(store.page_where(page, |u| u.name.to_lowercase().contains(&needle)))
    }

    async fn find_by_status(
        &self,
        status: UserStatus,
        page: PageRequest,
    ) -> UserResult<Page<User>> {
        let store = self.store.read().await;
        Ok(store.page_where(page, |u| u.status == status))
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.email_taken(email, None))
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let mut store = self.store.write().await;

        if store.users.remove(&id).is_some() {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete(&self, user: &User) -> UserResult<bool> {
        match user.id {
            Some(id) => self.delete_by_id(id).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str, status: UserStatus) -> User {
        User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            phone_number: None,
            status,
        }
    }

    async fn seeded() -> InMemoryUserRepository {
        let repo = InMemoryUserRepository::new();
        for (name, email, status) in [
            ("John Smith", "john@example.com", UserStatus::Active),
            ("Johnny Cash", "johnny@example.com", UserStatus::Inactive),
            ("Jane Doe", "jane@example.com", UserStatus::Active),
        ] {
            repo.save(user(name, email, status)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.save(user("Ada", "ada@example.com", UserStatus::Active)).await.unwrap();
        let second = repo.save(user("Bob", "bob@example.com", UserStatus::Active)).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.find_by_id(1).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let first = repo.save(user("Ada", "ada@example.com", UserStatus::Active)).await.unwrap();
        repo.delete(&first).await.unwrap();

        let second = repo.save(user("Bob", "bob@example.com", UserStatus::Active)).await.unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("Ada", "ada@example.com", UserStatus::Active)).await.unwrap();

        let result = repo.save(user("Other Ada", "ada@example.com", UserStatus::Active)).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_save_with_id_updates_in_place() {
        let repo = seeded().await;
        let mut jane = repo.find_by_id(3).await.unwrap().unwrap();
        jane.status = UserStatus::Suspended;

        let saved = repo.save(jane.clone()).await.unwrap();
        assert_eq!(saved, jane);
        assert_eq!(repo.find_all(PageRequest::default()).await.unwrap().total_elements, 3);
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let mut ghost = user("Ghost", "ghost@example.com", UserStatus::Active);
        ghost.id = Some(99);

        assert!(matches!(repo.save(ghost).await, Err(UserError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_name_search_ignores_case() {
        let repo = seeded().await;

        let page = repo
            .find_by_name_containing_ignore_case("JOHN", PageRequest::default())
            .await
            .unwrap();

        let names: Vec<_> = page.content.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["John Smith", "Johnny Cash"]);
        assert_eq!(page.total_elements, 2);
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let repo = seeded().await;

        let page = repo
            .find_by_status(UserStatus::Active, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 2);
        assert!(page.content.iter().all(|u| u.status == UserStatus::Active));
    }

    #[tokio::test]
    async fn test_find_all_pages() {
        let repo = seeded().await;

        let page = repo.find_all(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "Jane Doe");
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.number, 1);
    }

    #[tokio::test]
    async fn test_exists_by_email_is_case_sensitive() {
        let repo = seeded().await;
        assert!(repo.exists_by_email("jane@example.com").await.unwrap());
        assert!(!repo.exists_by_email("JANE@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = seeded().await;
        assert!(repo.delete_by_id(1).await.unwrap());
        assert!(!repo.delete_by_id(1).await.unwrap());

        let unsaved = user("Nobody", "nobody@example.com", UserStatus::Active);
        assert!(!repo.delete(&unsaved).await.unwrap());
    }
}
