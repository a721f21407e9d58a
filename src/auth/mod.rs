//! The login gate: password hashing, token issuance and verification, and
//! the middleware protecting every resource route.

pub mod jwt;
pub mod middleware;
pub mod password;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::user;

pub use jwt::JwtConfig;
pub use middleware::{CurrentUser, require_auth};

/// Create the initial admin account when the user table is empty, so a fresh
/// install can be logged into without a manual database step.
///
/// # Errors
///
/// Returns an `ApiError` when hashing or the insert fails.
pub async fn seed_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<(), ApiError> {
    let existing = user::Entity::find()
        .count(db)
        .await
        .map_err(ApiError::database)?;
    if existing > 0 {
        return Ok(());
    }

    let password_hash = password::hash_password(password)?;
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        role: Set("admin".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(ApiError::from)?;

    tracing::info!(username, "seeded initial admin account");
    Ok(())
}
