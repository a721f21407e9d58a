//! Staff accounts behind the login gate. The password hash never leaves the
//! database layer; API responses carry [`UserInfo`] only.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The public view of an account, embedded in login and register responses.
#[derive(ToSchema, Serialize, Clone, Debug)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl From<Model> for UserInfo {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
        }
    }
}
