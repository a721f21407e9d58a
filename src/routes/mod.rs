//! HTTP surface. The CRUD handlers are generic over [`CrudResource`]; each
//! resource contributes its routes through [`crud_router`], and everything is
//! assembled under `/api/v1` with the auth guard on the protected subset.

pub mod auth;
pub mod statistics;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    routing::get,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::AppState;
use crate::auth::require_auth;
use crate::errors::ApiError;
use crate::filtering::{
    FilterOptions, apply_filters, calculate_content_range, parse_pagination, parse_sorting,
};
use crate::models::{Car, Customer, ServiceRecord};
use crate::traits::CrudResource;
use crate::validation::Validatable;

/// List a resource with filtering, sorting, and pagination. The unpaginated
/// total travels in the `Content-Range` header.
pub async fn get_all<T>(
    Query(params): Query<FilterOptions>,
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<Vec<T>>), ApiError>
where
    T: CrudResource + Serialize,
{
    let (offset, limit) = parse_pagination(&params);
    let condition = apply_filters::<T>(params.filter.clone());
    let (order_column, order_direction) =
        parse_sorting(&params, &T::sortable_columns(), T::default_order());

    let items = T::get_all(
        &state.db,
        &condition,
        order_column,
        order_direction,
        offset,
        limit,
    )
    .await?;
    let total_count = T::total_count(&state.db, &condition).await?;
    let headers = calculate_content_range(offset, limit, total_count, T::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(items)))
}

pub async fn get_one<T>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, ApiError>
where
    T: CrudResource + Serialize,
{
    let item = T::get_one(&state.db, id).await?;
    Ok(Json(item))
}

pub async fn create_one<T>(
    State(state): State<AppState>,
    Json(payload): Json<T::CreateModel>,
) -> Result<(StatusCode, Json<T>), ApiError>
where
    T: CrudResource + Serialize,
    T::CreateModel: Validatable,
{
    payload.validate()?;
    let created = T::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_one<T>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<T::UpdateModel>,
) -> Result<Json<T>, ApiError>
where
    T: CrudResource + Serialize,
    T::UpdateModel: Validatable,
{
    payload.validate()?;
    let updated = T::update(&state.db, id, payload).await?;
    Ok(Json(updated))
}

pub async fn delete_one<T>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
    T: CrudResource,
{
    T::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_many<T>(
    State(state): State<AppState>,
    Json(ids): Json<Vec<Uuid>>,
) -> Result<StatusCode, ApiError>
where
    T: CrudResource,
{
    T::delete_many(&state.db, ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The standard route set for one resource, mounted at its plural name.
#[must_use]
pub fn crud_router<T>() -> Router<AppState>
where
    T: CrudResource + Serialize + 'static,
    T::CreateModel: DeserializeOwned + Validatable + 'static,
    T::UpdateModel: DeserializeOwned + Validatable + 'static,
{
    Router::new()
        .route(
            &format!("/{}", T::RESOURCE_NAME_PLURAL),
            get(get_all::<T>)
                .post(create_one::<T>)
                .delete(delete_many::<T>),
        )
        .route(
            &format!("/{}/{{id}}", T::RESOURCE_NAME_PLURAL),
            get(get_one::<T>)
                .patch(update_one::<T>)
                .delete(delete_one::<T>),
        )
}

/// The full `/api/v1` router. Login and registration are public; everything
/// else sits behind the auth guard.
#[must_use]
pub fn api_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(crud_router::<Customer>())
        .merge(crud_router::<Car>())
        .merge(crud_router::<ServiceRecord>())
        .route("/statistics", get(statistics::get_statistics))
        .route("/auth/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = auth::auth_router().merge(protected);

    Router::new().nest("/api/v1", api).with_state(state)
}
