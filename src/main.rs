use anyhow::Context;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, fmt};

use autoshop_api::{
    AppState, auth, auth::JwtConfig, build_app, config::Config, migrations::Migrator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    auth::seed_admin(&db, &config.admin_username, &config.admin_password)
        .await
        .context("failed to seed admin account")?;

    let state = AppState::new(
        db,
        JwtConfig {
            secret: config.jwt_secret.clone(),
            expiry_hours: config.token_expiry_hours,
        },
    );

    let app = build_app(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    axum::serve(listener, app)
        .await
        .context("server exited with error")?;
    Ok(())
}
