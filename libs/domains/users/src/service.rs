use database::pagination::MAX_PAGE_SIZE;
use database::{Page, PageRequest};
use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, RegisterUser, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of users. A `name` filter wins over a `status` filter.
    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Page<User>> {
        let page = PageRequest::new(filter.page, filter.size);

        match (filter.name, filter.status) {
            (Some(name), _) => {
                self.repository
                    .find_by_name_containing_ignore_case(&name, page)
                    .await
            }
            (None, Some(status)) => self.repository.find_by_status(status, page).await,
            (None, None) => self.repository.find_all(page).await,
        }
    }

    /// Create a user; status defaults to `ACTIVE`
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input.validate()?;

        if self.repository.exists_by_email(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        self.repository.save(User::new(input)).await
    }

    pub async fn get_user(&self, id: i64) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Merge the present fields of `input` into the stored user
    pub async fn update_user(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        input.validate()?;

        let mut user = self.get_user(id).await?;

        if let Some(email) = input.email.as_deref() {
            if email != user.email && self.repository.exists_by_email(email).await? {
                return Err(UserError::DuplicateEmail(email.to_string()));
            }
        }

        user.apply_update(input);
        self.repository.save(user).await
    }

    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        let user = self.get_user(id).await?;

        if !self.repository.delete(&user).await? {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// Store a user from the legacy endpoint; no field rules are applied
    pub async fn register_user(&self, input: RegisterUser) -> UserResult<User> {
        if self.repository.exists_by_email(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        self.repository.save(input.into()).await
    }

    /// Every user, ordered by id
    pub async fn all_users(&self) -> UserResult<Vec<User>> {
        let mut users = Vec::new();
        let mut page_number = 0;

        loop {
            let page = self
                .repository
                .find_all(PageRequest::new(page_number, MAX_PAGE_SIZE))
                .await?;
            let done = page.is_empty() || page.number + 1 >= page.total_pages;
            users.extend(page.content);

            if done {
                return Ok(users);
            }
            page_number += 1;
        }
    }

    /// Delete without reporting whether the user existed
    pub async fn remove_user(&self, id: i64) -> UserResult<()> {
        self.repository.delete_by_id(id).await?;
        Ok(())
    }
}
