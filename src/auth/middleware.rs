//! Route guard for everything behind the login gate.
//!
//! The bearer token's signature and expiry are verified, then the subject is
//! re-checked against the user table: a token for a deleted account is as
//! invalid as a forged one.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sea_orm::EntityTrait;
use uuid::Uuid;

use super::jwt;
use crate::AppState;
use crate::errors::ApiError;
use crate::models::user;

/// The authenticated account, inserted into request extensions for handlers.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

/// # Errors
///
/// Returns 401 when the Authorization header is missing or malformed, the
/// token fails verification, or the subject no longer exists.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?;

    let claims = jwt::verify_token(token, &state.jwt)?;

    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
    });

    Ok(next.run(req).await)
}
