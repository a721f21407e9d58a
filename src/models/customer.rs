//! Customer records: people or companies owning zero or more cars.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*, sea_query::Order};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::traits::{CrudResource, MergeIntoActiveModel};
use crate::validation::{Validatable, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_name = "type")]
    pub customer_type: CustomerType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    #[sea_orm(string_value = "individual")]
    Individual,
    #[sea_orm(string_value = "company")]
    Company,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::car::Entity")]
    Cars,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cars.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Customer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            customer_type: model.customer_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
}

impl From<CustomerCreate> for ActiveModel {
    fn from(create: CustomerCreate) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            name: Set(create.name),
            email: Set(create.email),
            phone: Set(create.phone),
            address: Set(create.address),
            customer_type: Set(create.customer_type),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Absent fields stay untouched; `phone` and `address` accept an explicit
/// `null` to clear the stored value.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default)]
pub struct CustomerUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub phone: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub address: Option<Option<String>>,
    #[serde(default, rename = "type")]
    pub customer_type: Option<CustomerType>,
}

impl MergeIntoActiveModel<ActiveModel> for CustomerUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(email) = self.email {
            existing.email = Set(email);
        }
        if let Some(phone) = self.phone {
            existing.phone = Set(phone);
        }
        if let Some(address) = self.address {
            existing.address = Set(address);
        }
        if let Some(customer_type) = self.customer_type {
            existing.customer_type = Set(customer_type);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

fn validate_email(email: &str, errors: &mut ValidationErrors) {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        errors.add("email", "must be a valid email address");
    }
}

impl Validatable for CustomerCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "must not be empty");
        }
        validate_email(&self.email, &mut errors);
        errors.result()
    }
}

impl Validatable for CustomerUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            errors.add("name", "must not be empty");
        }
        if let Some(email) = &self.email {
            validate_email(email, &mut errors);
        }
        errors.result()
    }
}

#[async_trait]
impl CrudResource for Customer {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = CustomerCreate;
    type UpdateModel = CustomerUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "customer";
    const RESOURCE_NAME_PLURAL: &'static str = "customers";

    fn default_order() -> (Self::ColumnType, Order) {
        // Newest first, matching the admin list views
        (Column::CreatedAt, Order::Desc)
    }

    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("name", Column::Name),
            ("email", Column::Email),
            ("type", Column::CustomerType),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("email", Column::Email),
            ("phone", Column::Phone),
            ("type", Column::CustomerType),
        ]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["name", "email"]
    }

    fn searchable_columns() -> Vec<Self::ColumnType> {
        vec![
            Column::Name,
            Column::Email,
            Column::Phone,
            Column::Address,
        ]
    }
}
