//! Service record CRUD: joined read fields, cost validation, and the car
//! cascade.

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

mod common;
use common::{create_car, create_customer, create_service, login_as_admin, send, setup_test_app};

fn cost_of(record: &Value) -> Decimal {
    record["cost"]
        .as_str()
        .expect("cost serialized as a decimal string")
        .parse()
        .expect("cost parses as a decimal")
}

async fn seed_car(app: &axum::Router, token: &str) -> (String, String) {
    let customer = create_customer(app, token, "Erin", "erin@example.com").await;
    let customer_id = customer["id"].as_str().unwrap().to_string();
    let car = create_car(app, token, &customer_id, "Toyota", "Camry", "SVC-1").await;
    (customer_id, car["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn reads_carry_the_joined_car_and_owner_fields() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    let (_, car_id) = seed_car(&app, &token).await;

    let service = create_service(&app, &token, &car_id, "Oil Change", "2024-03-15", "89.50").await;
    assert_eq!(service["service_type"], "Oil Change");
    assert_eq!(service["service_date"], "2024-03-15");
    assert_eq!(cost_of(&service), "89.50".parse::<Decimal>().unwrap());
    assert_eq!(service["car_make"], "Toyota");
    assert_eq!(service["car_model"], "Camry");
    assert_eq!(service["registration_number"], "SVC-1");
    assert_eq!(service["owner_name"], "Erin");

    let service_id = service["id"].as_str().unwrap();
    let (status, fetched, _) = send(
        &app,
        "GET",
        &format!("/api/v1/services/{service_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["owner_name"], "Erin");
}

#[tokio::test]
async fn non_positive_cost_is_rejected() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    let (_, car_id) = seed_car(&app, &token).await;

    for bad_cost in ["0", "-15.00"] {
        let (status, body, _) = send(
            &app,
            "POST",
            "/api/v1/services",
            Some(&token),
            Some(json!({
                "car_id": car_id,
                "service_type": "Oil Change",
                "service_date": "2024-03-15",
                "cost": bad_cost
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "cost {bad_cost}");
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0], "cost: must be positive");
    }
}

#[tokio::test]
async fn filter_by_car_id_scopes_the_list() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;

    let customer = create_customer(&app, &token, "Frank", "frank@example.com").await;
    let customer_id = customer["id"].as_str().unwrap();
    let first = create_car(&app, &token, customer_id, "Ford", "Focus", "FLT-1").await;
    let second = create_car(&app, &token, customer_id, "Ford", "Kuga", "FLT-2").await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    create_service(&app, &token, first_id, "Oil Change", "2024-01-10", "80.00").await;
    create_service(&app, &token, first_id, "Brake Check", "2024-02-10", "120.00").await;
    create_service(&app, &token, second_id, "Oil Change", "2024-03-10", "80.00").await;

    let filter = serde_json::to_string(&json!({"car_id": first_id})).unwrap();
    let uri = format!(
        "/api/v1/services?filter={}",
        url_escape::encode_component(&filter)
    );
    let (status, list, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|s| s["car_id"] == first["id"]));
}

#[tokio::test]
async fn list_defaults_to_most_recent_service_first() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    let (_, car_id) = seed_car(&app, &token).await;

    create_service(&app, &token, &car_id, "Oil Change", "2023-06-01", "75.00").await;
    create_service(&app, &token, &car_id, "Tire Rotation", "2024-06-01", "45.00").await;

    let (status, list, _) = send(&app, "GET", "/api/v1/services", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list[0]["service_date"], "2024-06-01");
    assert_eq!(list[1]["service_date"], "2023-06-01");
}

#[tokio::test]
async fn patch_updates_cost_and_clears_notes() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    let (_, car_id) = seed_car(&app, &token).await;

    let (_, created, _) = send(
        &app,
        "POST",
        "/api/v1/services",
        Some(&token),
        Some(json!({
            "car_id": car_id,
            "service_type": "Brake Check",
            "service_date": "2024-04-01",
            "cost": "150.00",
            "notes": "front pads worn"
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["notes"], "front pads worn");

    let (status, updated, _) = send(
        &app,
        "PATCH",
        &format!("/api/v1/services/{id}"),
        Some(&token),
        Some(json!({"cost": "175.25", "notes": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cost_of(&updated), "175.25".parse::<Decimal>().unwrap());
    assert!(updated["notes"].is_null());
    assert_eq!(updated["service_type"], "Brake Check");
}

#[tokio::test]
async fn deleting_a_car_cascades_to_its_services() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    let (_, car_id) = seed_car(&app, &token).await;

    let service = create_service(&app, &token, &car_id, "Oil Change", "2024-05-01", "90.00").await;
    let service_id = service["id"].as_str().unwrap();

    let (status, _, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/cars/{car_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(
        &app,
        "GET",
        &format!("/api/v1/services/{service_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
