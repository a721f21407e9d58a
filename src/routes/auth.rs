//! Login, registration, and the current-account endpoint.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, SqlErr,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::auth::{CurrentUser, jwt, password};
use crate::errors::ApiError;
use crate::models::{UserInfo, user};
use crate::validation::{Validatable, ValidationErrors};

#[derive(Deserialize, ToSchema, Clone, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema, Clone, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

impl Validatable for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.trim().len() < 3 {
            errors.add("username", "must be at least 3 characters");
        }
        if self.password.len() < 8 {
            errors.add("password", "must be at least 8 characters");
        }
        errors.result()
    }
}

#[must_use]
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Exchange credentials for a bearer token. Unknown usernames and wrong
/// passwords get the same answer.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.trim()))
        .one(&state.db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !password::verify_password(&user.password_hash, &payload.password)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = jwt::issue_token(user.id, &state.jwt)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.validate()?;

    let password_hash = password::hash_password(&payload.password)?;
    let user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(payload.username.trim().to_string()),
        password_hash: Set(password_hash),
        role: Set("admin".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::conflict("Username already exists"),
        _ => ApiError::from(err),
    })?;

    let token = jwt::issue_token(user.id, &state.jwt)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// The account behind the presented token, as resolved by the auth guard.
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<UserInfo> {
    Json(UserInfo {
        id: current.id,
        username: current.username,
        role: current.role,
    })
}
