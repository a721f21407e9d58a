pub mod auth;
pub mod config;
pub mod errors;
pub mod filtering;
pub mod migrations;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod traits;
pub mod validation;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use auth::JwtConfig;

pub use errors::ApiError;
pub use traits::{CrudResource, MergeIntoActiveModel};

/// Shared handler state: the connection pool plus the token configuration.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt: JwtConfig) -> Self {
        Self {
            db,
            jwt: Arc::new(jwt),
        }
    }
}

/// Assemble the full application router: `/api/v1` plus the docs page.
#[must_use]
pub fn build_app(state: AppState) -> axum::Router {
    routes::api_router(state).merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
}
