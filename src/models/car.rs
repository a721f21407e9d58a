//! Car records. Reads resolve the owning customer's name server-side, so the
//! admin list view never has to stitch records together client-side.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, Condition, DatabaseConnection, IntoActiveModel, QueryOrder, QuerySelect,
    entity::prelude::*, sea_query::Order,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::customer;
use crate::traits::{CrudResource, MergeIntoActiveModel};
use crate::validation::{Validatable, ValidationErrors};

const MIN_MODEL_YEAR: i32 = 1900;
const MAX_MODEL_YEAR: i32 = 2100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    #[sea_orm(unique)]
    pub registration_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,

    #[sea_orm(has_many = "super::service_record::Entity")]
    ServiceRecords,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::service_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Car {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    pub registration_number: String,
    /// Owning customer's name, resolved on reads.
    #[serde(default)]
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Car {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            make: model.make,
            model: model.model,
            year: model.year,
            fuel_type: model.fuel_type,
            registration_number: model.registration_number,
            owner_name: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn with_owner(model: Model, owner: Option<customer::Model>) -> Car {
    let mut car = Car::from(model);
    car.owner_name = owner.map(|c| c.name);
    car
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct CarCreate {
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    pub registration_number: String,
}

impl From<CarCreate> for ActiveModel {
    fn from(create: CarCreate) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            customer_id: Set(create.customer_id),
            make: Set(create.make),
            model: Set(create.model),
            year: Set(create.year),
            fuel_type: Set(create.fuel_type),
            registration_number: Set(create.registration_number),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default)]
pub struct CarUpdate {
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
}

impl MergeIntoActiveModel<ActiveModel> for CarUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(customer_id) = self.customer_id {
            existing.customer_id = Set(customer_id);
        }
        if let Some(make) = self.make {
            existing.make = Set(make);
        }
        if let Some(model) = self.model {
            existing.model = Set(model);
        }
        if let Some(year) = self.year {
            existing.year = Set(year);
        }
        if let Some(fuel_type) = self.fuel_type {
            existing.fuel_type = Set(fuel_type);
        }
        if let Some(registration_number) = self.registration_number {
            existing.registration_number = Set(registration_number);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

fn validate_year(year: i32, errors: &mut ValidationErrors) {
    if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&year) {
        errors.add(
            "year",
            format!("must be between {MIN_MODEL_YEAR} and {MAX_MODEL_YEAR}"),
        );
    }
}

impl Validatable for CarCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.make.trim().is_empty() {
            errors.add("make", "must not be empty");
        }
        if self.model.trim().is_empty() {
            errors.add("model", "must not be empty");
        }
        if self.fuel_type.trim().is_empty() {
            errors.add("fuel_type", "must not be empty");
        }
        if self.registration_number.trim().is_empty() {
            errors.add("registration_number", "must not be empty");
        }
        validate_year(self.year, &mut errors);
        errors.result()
    }
}

impl Validatable for CarUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(make) = &self.make
            && make.trim().is_empty()
        {
            errors.add("make", "must not be empty");
        }
        if let Some(model) = &self.model
            && model.trim().is_empty()
        {
            errors.add("model", "must not be empty");
        }
        if let Some(fuel_type) = &self.fuel_type
            && fuel_type.trim().is_empty()
        {
            errors.add("fuel_type", "must not be empty");
        }
        if let Some(registration_number) = &self.registration_number
            && registration_number.trim().is_empty()
        {
            errors.add("registration_number", "must not be empty");
        }
        if let Some(year) = self.year {
            validate_year(year, &mut errors);
        }
        errors.result()
    }
}

#[async_trait]
impl CrudResource for Car {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = CarCreate;
    type UpdateModel = CarUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "car";
    const RESOURCE_NAME_PLURAL: &'static str = "cars";

    async fn get_all(
        db: &DatabaseConnection,
        condition: &Condition,
        order_column: Self::ColumnType,
        order_direction: Order,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, DbErr> {
        let rows = Entity::find()
            .find_also_related(customer::Entity)
            .filter(condition.clone())
            .order_by(order_column, order_direction)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(model, owner)| with_owner(model, owner))
            .collect())
    }

    async fn get_one(db: &DatabaseConnection, id: Uuid) -> Result<Self, DbErr> {
        let (model, owner) = Entity::find_by_id(id)
            .find_also_related(customer::Entity)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            )))?;
        Ok(with_owner(model, owner))
    }

    // Re-read after writes so the response carries the resolved owner name.
    async fn create(db: &DatabaseConnection, create_model: CarCreate) -> Result<Self, DbErr> {
        let active_model: ActiveModel = create_model.into();
        let model = active_model.insert(db).await?;
        Self::get_one(db, model.id).await
    }

    async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        update_model: CarUpdate,
    ) -> Result<Self, DbErr> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            )))?;
        let updated = update_model
            .merge_into_activemodel(model.into_active_model())?
            .update(db)
            .await?;
        Self::get_one(db, updated.id).await
    }

    fn default_order() -> (Self::ColumnType, Order) {
        (Column::CreatedAt, Order::Desc)
    }

    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("make", Column::Make),
            ("model", Column::Model),
            ("year", Column::Year),
            ("registration_number", Column::RegistrationNumber),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("customer_id", Column::CustomerId),
            ("make", Column::Make),
            ("model", Column::Model),
            ("year", Column::Year),
            ("fuel_type", Column::FuelType),
            ("registration_number", Column::RegistrationNumber),
        ]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["make", "model"]
    }

    fn searchable_columns() -> Vec<Self::ColumnType> {
        vec![
            Column::Make,
            Column::Model,
            Column::RegistrationNumber,
            Column::FuelType,
        ]
    }
}
