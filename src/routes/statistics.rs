//! The dashboard aggregates: totals plus the three group-by-max queries the
//! statistics page displays. All reduction happens in SQL.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryOrder, QuerySelect,
    RelationTrait,
    sea_query::{Alias, Expr},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::errors::ApiError;
use crate::models::{car, customer, service_record};

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_customers: CountStat,
    pub total_revenue: RevenueStat,
    pub most_common_service: Option<ServiceTypeStat>,
    pub most_frequent_customer: Option<CustomerVisitsStat>,
    pub most_serviced_car: Option<CarServiceStat>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct CountStat {
    pub count: u64,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct RevenueStat {
    /// Null when no services have been recorded yet.
    pub total: Option<Decimal>,
}

#[derive(Serialize, ToSchema, Debug, FromQueryResult)]
pub struct ServiceTypeStat {
    pub service_type: String,
    pub count: i64,
}

#[derive(Serialize, ToSchema, Debug, FromQueryResult)]
pub struct CustomerVisitsStat {
    pub name: String,
    pub visit_count: i64,
}

#[derive(Serialize, ToSchema, Debug, FromQueryResult)]
pub struct CarServiceStat {
    pub make: String,
    pub model: String,
    pub service_count: i64,
}

#[derive(FromQueryResult)]
struct RevenueRow {
    total: Option<Decimal>,
}

pub async fn get_statistics(State(state): State<AppState>) -> Result<Json<Statistics>, ApiError> {
    let db = &state.db;

    let total_customers = customer::Entity::find()
        .count(db)
        .await
        .map_err(ApiError::database)?;

    let total_revenue = service_record::Entity::find()
        .select_only()
        .column_as(service_record::Column::Cost.sum(), "total")
        .into_model::<RevenueRow>()
        .one(db)
        .await
        .map_err(ApiError::database)?
        .and_then(|row| row.total);

    let most_common_service = service_record::Entity::find()
        .select_only()
        .column(service_record::Column::ServiceType)
        .column_as(service_record::Column::Id.count(), "count")
        .group_by(service_record::Column::ServiceType)
        .order_by_desc(Expr::col(Alias::new("count")))
        .limit(1)
        .into_model::<ServiceTypeStat>()
        .one(db)
        .await
        .map_err(ApiError::database)?;

    let most_frequent_customer = service_record::Entity::find()
        .select_only()
        .join(JoinType::InnerJoin, service_record::Relation::Car.def())
        .join(JoinType::InnerJoin, car::Relation::Customer.def())
        .column_as(customer::Column::Name, "name")
        .column_as(service_record::Column::Id.count(), "visit_count")
        .group_by(customer::Column::Id)
        .order_by_desc(Expr::col(Alias::new("visit_count")))
        .limit(1)
        .into_model::<CustomerVisitsStat>()
        .one(db)
        .await
        .map_err(ApiError::database)?;

    let most_serviced_car = service_record::Entity::find()
        .select_only()
        .join(JoinType::InnerJoin, service_record::Relation::Car.def())
        .column_as(car::Column::Make, "make")
        .column_as(car::Column::Model, "model")
        .column_as(service_record::Column::Id.count(), "service_count")
        .group_by(car::Column::Id)
        .order_by_desc(Expr::col(Alias::new("service_count")))
        .limit(1)
        .into_model::<CarServiceStat>()
        .one(db)
        .await
        .map_err(ApiError::database)?;

    Ok(Json(Statistics {
        total_customers: CountStat {
            count: total_customers,
        },
        total_revenue: RevenueStat {
            total: total_revenue,
        },
        most_common_service,
        most_frequent_customer,
        most_serviced_car,
    }))
}
