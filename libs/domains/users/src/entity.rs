use crate::models::{User, UserStatus};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the `users` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    pub status: UserStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            email: model.email,
            phone_number: model.phone_number,
            status: model.status,
        }
    }
}

/// A user without an id becomes an insert, one with an id an update of every column.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: user.id.map_or(NotSet, Set),
            name: Set(user.name),
            email: Set(user.email),
            phone_number: Set(user.phone_number),
            status: Set(user.status),
        }
    }
}
