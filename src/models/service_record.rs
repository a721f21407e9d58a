//! Service records: billable maintenance events tied to a car. Reads carry
//! the serviced car's make, model and registration plus the owner's name,
//! resolved server-side the way the admin list view expects them.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::Set, Condition, DatabaseConnection, IntoActiveModel, QueryOrder, QuerySelect,
    entity::prelude::*, sea_query::Order,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{car, customer};
use crate::traits::{CrudResource, MergeIntoActiveModel};
use crate::validation::{Validatable, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub car_id: Uuid,
    pub service_type: String,
    pub service_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cost: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id"
    )]
    Car,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub car_id: Uuid,
    pub service_type: String,
    pub service_date: NaiveDate,
    pub cost: Decimal,
    pub notes: Option<String>,
    /// Joined fields, resolved on reads.
    #[serde(default)]
    pub car_make: Option<String>,
    #[serde(default)]
    pub car_model: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for ServiceRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            car_id: model.car_id,
            service_type: model.service_type,
            service_date: model.service_date,
            cost: model.cost,
            notes: model.notes,
            car_make: None,
            car_model: None,
            registration_number: None,
            owner_name: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn with_car_details(
    model: Model,
    car: Option<car::Model>,
    owner_names: &HashMap<Uuid, String>,
) -> ServiceRecord {
    let mut record = ServiceRecord::from(model);
    if let Some(car) = car {
        record.owner_name = owner_names.get(&car.customer_id).cloned();
        record.car_make = Some(car.make);
        record.car_model = Some(car.model);
        record.registration_number = Some(car.registration_number);
    }
    record
}

/// Batch-load the owner name for each car's customer.
async fn load_owner_names(
    db: &DatabaseConnection,
    cars: impl Iterator<Item = Option<&car::Model>>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    let customer_ids: Vec<Uuid> = cars.flatten().map(|car| car.customer_id).collect();
    if customer_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let owners = customer::Entity::find()
        .filter(customer::Column::Id.is_in(customer_ids))
        .all(db)
        .await?;
    Ok(owners.into_iter().map(|c| (c.id, c.name)).collect())
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct ServiceRecordCreate {
    pub car_id: Uuid,
    pub service_type: String,
    pub service_date: NaiveDate,
    pub cost: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<ServiceRecordCreate> for ActiveModel {
    fn from(create: ServiceRecordCreate) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            car_id: Set(create.car_id),
            service_type: Set(create.service_type),
            service_date: Set(create.service_date),
            cost: Set(create.cost),
            notes: Set(create.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default)]
pub struct ServiceRecordUpdate {
    #[serde(default)]
    pub car_id: Option<Uuid>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub service_date: Option<NaiveDate>,
    #[serde(default)]
    pub cost: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub notes: Option<Option<String>>,
}

impl MergeIntoActiveModel<ActiveModel> for ServiceRecordUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(car_id) = self.car_id {
            existing.car_id = Set(car_id);
        }
        if let Some(service_type) = self.service_type {
            existing.service_type = Set(service_type);
        }
        if let Some(service_date) = self.service_date {
            existing.service_date = Set(service_date);
        }
        if let Some(cost) = self.cost {
            existing.cost = Set(cost);
        }
        if let Some(notes) = self.notes {
            existing.notes = Set(notes);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

fn validate_cost(cost: Decimal, errors: &mut ValidationErrors) {
    if cost <= Decimal::ZERO {
        errors.add("cost", "must be positive");
    }
}

impl Validatable for ServiceRecordCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.service_type.trim().is_empty() {
            errors.add("service_type", "must not be empty");
        }
        validate_cost(self.cost, &mut errors);
        errors.result()
    }
}

impl Validatable for ServiceRecordUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(service_type) = &self.service_type
            && service_type.trim().is_empty()
        {
            errors.add("service_type", "must not be empty");
        }
        if let Some(cost) = self.cost {
            validate_cost(cost, &mut errors);
        }
        errors.result()
    }
}

#[async_trait]
impl CrudResource for ServiceRecord {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = ServiceRecordCreate;
    type UpdateModel = ServiceRecordUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "service";
    const RESOURCE_NAME_PLURAL: &'static str = "services";

    async fn get_all(
        db: &DatabaseConnection,
        condition: &Condition,
        order_column: Self::ColumnType,
        order_direction: Order,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, DbErr> {
        let rows = Entity::find()
            .find_also_related(car::Entity)
            .filter(condition.clone())
            .order_by(order_column, order_direction)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        let owner_names = load_owner_names(db, rows.iter().map(|(_, car)| car.as_ref())).await?;
        Ok(rows
            .into_iter()
            .map(|(model, car)| with_car_details(model, car, &owner_names))
            .collect())
    }

    async fn get_one(db: &DatabaseConnection, id: Uuid) -> Result<Self, DbErr> {
        let (model, car) = Entity::find_by_id(id)
            .find_also_related(car::Entity)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            )))?;
        let owner_names = load_owner_names(db, std::iter::once(car.as_ref())).await?;
        Ok(with_car_details(model, car, &owner_names))
    }

    // Re-read after writes so the response carries the joined car fields.
    async fn create(
        db: &DatabaseConnection,
        create_model: ServiceRecordCreate,
    ) -> Result<Self, DbErr> {
        let active_model: ActiveModel = create_model.into();
        let model = active_model.insert(db).await?;
        Self::get_one(db, model.id).await
    }

    async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        update_model: ServiceRecordUpdate,
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
        // Most recent service first, matching the admin list view
        (Column::ServiceDate, Order::Desc)
    }

    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("service_type", Column::ServiceType),
            ("service_date", Column::ServiceDate),
            ("cost", Column::Cost),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("car_id", Column::CarId),
            ("service_type", Column::ServiceType),
            ("service_date", Column::ServiceDate),
            ("cost", Column::Cost),
        ]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["service_type"]
    }

    fn searchable_columns() -> Vec<Self::ColumnType> {
        vec![Column::ServiceType, Column::Notes]
    }
}
