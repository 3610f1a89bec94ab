//! Generic SeaORM data access shared by the domain repositories.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QuerySelect, Select,
};

use crate::pagination::{Page, PageRequest};

/// Primary-key CRUD and pagination for a single entity.
///
/// Domain repositories wrap one of these and add their own queries on top,
/// borrowing the connection through [`BaseRepository::db`].
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_by_id<K>(&self, id: K) -> Result<Option<E::Model>, DbErr>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        E::find_by_id(id).one(&self.db).await
    }

    pub async fn insert<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(&self.db).await
    }

    /// Fails with `DbErr::RecordNotUpdated` when no row has the model's key.
    pub async fn update<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.update(&self.db).await
    }

    /// Returns the number of rows removed.
    pub async fn delete_by_id<K>(&self, id: K) -> Result<u64, DbErr>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    /// Run `select` as a counted, windowed query.
    ///
    /// `select` must already carry its filters and ordering. A window that
    /// starts at or past the last row comes back empty without querying rows.
    pub async fn fetch_page(
        &self,
        select: Select<E>,
        request: PageRequest,
    ) -> Result<Page<E::Model>, DbErr> {
        let total = select
            .clone()
            .paginate(&self.db, request.size())
            .num_items()
            .await?;

        let offset = request.offset();
        if offset >= total || offset > i64::MAX as u64 {
            return Ok(Page::new(Vec::new(), request, total));
        }

        let content = select
            .offset(offset)
            .limit(request.size())
            .all(&self.db)
            .await?;

        Ok(Page::new(content, request, total))
    }
}
