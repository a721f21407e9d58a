//! List-endpoint plumbing: pagination in both formats, `Content-Range`,
//! sorting in both formats, LIKE filters, free-text search, and graceful
//! handling of malformed parameters.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_customer, login_as_admin, send, setup_test_app};

async fn seed_customers(app: &axum::Router, token: &str) {
    for (name, email) in [
        ("Alice Anderson", "alice@example.com"),
        ("Bob Brown", "bob@example.com"),
        ("Carol Clark", "carol@example.com"),
        ("Dan Davis", "dan@example.com"),
        ("Eve Evans", "eve@example.com"),
    ] {
        create_customer(app, token, name, email).await;
    }
}

#[tokio::test]
async fn range_pagination_sets_content_range() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    let (status, list, headers) = send(
        &app,
        "GET",
        "/api/v1/customers?range=%5B0%2C1%5D",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(
        headers.get("Content-Range").unwrap().to_str().unwrap(),
        "customers 0-1/5"
    );
}

#[tokio::test]
async fn page_per_page_pagination() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    let (status, list, _) = send(
        &app,
        "GET",
        "/api/v1/customers?page=2&per_page=2&sort_by=name&order=ASC",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Carol Clark");
    assert_eq!(list[1]["name"], "Dan Davis");
}

#[tokio::test]
async fn both_sort_formats_agree() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    let sort = url_escape::encode_component(r#"["name","DESC"]"#).to_string();
    let (status, react_admin, _) = send(
        &app,
        "GET",
        &format!("/api/v1/customers?sort={sort}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, rest, _) = send(
        &app,
        "GET",
        "/api/v1/customers?sort_by=name&order=DESC",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(react_admin, rest);
    assert_eq!(react_admin.as_array().unwrap()[0]["name"], "Eve Evans");
}

#[tokio::test]
async fn unknown_sort_column_falls_back_to_default() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    let (status, list, _) = send(
        &app,
        "GET",
        "/api/v1/customers?sort_by=not_a_column&order=ASC",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn like_filter_matches_substrings_case_insensitively() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    let filter = url_escape::encode_component(r#"{"name": "anderson"}"#).to_string();
    let (status, list, _) = send(
        &app,
        "GET",
        &format!("/api/v1/customers?filter={filter}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Alice Anderson");
}

#[tokio::test]
async fn free_text_search_spans_searchable_columns() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    // "brown" appears in one name and "carol@" in one email
    let filter = url_escape::encode_component(r#"{"q": "BROWN"}"#).to_string();
    let (_, by_name, _) = send(
        &app,
        "GET",
        &format!("/api/v1/customers?filter={filter}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(by_name.as_array().unwrap().len(), 1);
    assert_eq!(by_name.as_array().unwrap()[0]["name"], "Bob Brown");

    let filter = url_escape::encode_component(r#"{"q": "carol@"}"#).to_string();
    let (_, by_email, _) = send(
        &app,
        "GET",
        &format!("/api/v1/customers?filter={filter}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(by_email.as_array().unwrap().len(), 1);
    assert_eq!(by_email.as_array().unwrap()[0]["name"], "Carol Clark");
}

#[tokio::test]
async fn numeric_comparison_suffixes_filter_cars() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;

    let customer = create_customer(&app, &token, "Fleet", "fleet@example.com").await;
    let customer_id = customer["id"].as_str().unwrap();
    for (model, year, reg) in [
        ("Old", 2005, "Y-1"),
        ("Mid", 2015, "Y-2"),
        ("New", 2022, "Y-3"),
    ] {
        let (status, _, _) = send(
            &app,
            "POST",
            "/api/v1/cars",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "make": "Skoda",
                "model": model,
                "year": year,
                "fuel_type": "petrol",
                "registration_number": reg
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let filter = url_escape::encode_component(r#"{"year_gte": 2015}"#).to_string();
    let (status, list, _) = send(
        &app,
        "GET",
        &format!("/api/v1/cars?filter={filter}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|car| car["year"].as_i64().unwrap() >= 2015));
}

#[tokio::test]
async fn malformed_filter_json_is_ignored() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    let filter = url_escape::encode_component("{not valid json").to_string();
    let (status, list, _) = send(
        &app,
        "GET",
        &format!("/api/v1/customers?filter={filter}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn unknown_filter_fields_are_ignored() {
    let app = setup_test_app().await;
    let token = login_as_admin(&app).await;
    seed_customers(&app, &token).await;

    let filter = url_escape::encode_component(r#"{"no_such_field": "x"}"#).to_string();
    let (status, list, _) = send(
        &app,
        "GET",
        &format!("/api/v1/customers?filter={filter}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 5);
}
