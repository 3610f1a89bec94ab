use async_trait::async_trait;
use database::postgres::is_unique_violation;
use database::{BaseRepository, Page, PageRequest};
use sea_orm::sea_query::{Expr, LikeExpr, extension::postgres::PgExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{User, UserStatus},
    repository::UserRepository,
};

pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn ordered() -> Select<entity::Entity> {
        entity::Entity::find().order_by_asc(entity::Column::Id)
    }

    async fn page(
        &self,
        select: Select<entity::Entity>,
        page: PageRequest,
    ) -> UserResult<Page<User>> {
        let models = self.base.fetch_page(select, page).await.map_err(storage)?;
        Ok(models.map(User::from))
    }
}

fn storage(e: DbErr) -> UserError {
    UserError::Storage(format!("Database error: {}", e))
}

/// `LIKE` pattern matching `needle` anywhere, with its wildcards taken literally
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: User) -> UserResult<User> {
        let email = user.email.clone();
        let id = user.id;
        let active_model: entity::ActiveModel = user.into();

        let result = match id {
            Some(_) => self.base.update(active_model).await,
            None => self.base.insert(active_model).await,
        };

        let model = result.map_err(|e| match (id, e) {
            (_, e) if is_unique_violation(&e) => UserError::DuplicateEmail(email),
            (Some(id), DbErr::RecordNotUpdated) => UserError::NotFound(id),
            (_, e) => storage(e),
        })?;

        if id.is_some() {
            tracing::info!(user_id = model.id, "Updated user");
        } else {
            tracing::info!(user_id = model.id, "Created user");
        }
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let model = self.base.find_by_id(id).await.map_err(storage)?;
        Ok(model.map(User::from))
    }

    async fn find_all(&self, page: PageRequest) -> UserResult<Page<User>> {
        self.page(Self::ordered(), page).await
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
        page: PageRequest,
    ) -> UserResult<Page<User>> {
        let matches_name = Expr::col((entity::Entity, entity::Column::Name))
            .ilike(LikeExpr::new(contains_pattern(name)).escape('\\'));

        self.page(Self::ordered().filter(matches_name), page).await
    }

    async fn find_by_status(
        &self,
        status: UserStatus,
        page: PageRequest,
    ) -> UserResult<Page<User>> {
        let select = Self::ordered().filter(entity::Column::Status.eq(status));
        self.page(select, page).await
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let exists = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.base.db())
            .await
            .map_err(storage)?
            .is_some();

        Ok(exists)
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await.map_err(storage)?;

        if rows_affected > 0 {
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
