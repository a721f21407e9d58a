#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

use autoshop_api::auth::{self, JwtConfig};
use autoshop_api::migrations::Migrator;
use autoshop_api::{AppState, build_app};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// A fresh app over an in-memory database with the admin account seeded.
pub async fn setup_test_app() -> Router {
    let (app, _) = setup_test_app_with_db().await;
    app
}

/// Same as [`setup_test_app`] but also hands back the database connection for
/// tests that need to poke at rows directly.
pub async fn setup_test_app_with_db() -> (Router, DatabaseConnection) {
    let db = setup_test_db()
        .await
        .expect("failed to set up test database");
    auth::seed_admin(&db, ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .expect("failed to seed admin account");
    let app = build_app(AppState::new(db.clone(), JwtConfig::default()));
    (app, db)
}

/// Fire one request and collect status, parsed JSON body (Null when empty or
/// not JSON), and response headers.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, HeaderMap) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body, headers)
}

/// Log in as the seeded admin and return a bearer token.
pub async fn login_as_admin(app: &Router) -> String {
    let (status, body, _) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"]
        .as_str()
        .expect("token in response")
        .to_string()
}

pub async fn create_customer(app: &Router, token: &str, name: &str, email: &str) -> Value {
    let (status, body, _) = send(
        app,
        "POST",
        "/api/v1/customers",
        Some(token),
        Some(json!({
            "name": name,
            "email": email,
            "type": "individual"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create customer failed: {body}");
    body
}

pub async fn create_car(
    app: &Router,
    token: &str,
    customer_id: &str,
    make: &str,
    model: &str,
    registration_number: &str,
) -> Value {
    let (status, body, _) = send(
        app,
        "POST",
        "/api/v1/cars",
        Some(token),
        Some(json!({
            "customer_id": customer_id,
            "make": make,
            "model": model,
            "year": 2018,
            "fuel_type": "petrol",
            "registration_number": registration_number
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create car failed: {body}");
    body
}

pub async fn create_service(
    app: &Router,
    token: &str,
    car_id: &str,
    service_type: &str,
    service_date: &str,
    cost: &str,
) -> Value {
    let (status, body, _) = send(
        app,
        "POST",
        "/api/v1/services",
        Some(token),
        Some(json!({
            "car_id": car_id,
            "service_type": service_type,
            "service_date": service_date,
            "cost": cost
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create service failed: {body}");
    body
}
