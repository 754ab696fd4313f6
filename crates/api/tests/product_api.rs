//! HTTP-level tests for the `/product/` resource.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, create_category, create_product, delete_auth, get, get_auth, patch_json_auth,
    post_json_auth, put_json_auth, send_raw,
};
use serde_json::json;

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let app = common::build_test_app();

    let response = get(app.app(), "/product/").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(app.app(), "/product/1/").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_returns_the_product_with_defaults() {
    let app = common::build_test_app();
    let token = app.token().await;
    let category = create_category(&app.store, "Books").await;

    let response = post_json_auth(
        app.app(),
        "/product/",
        json!({ "category": category.id, "title": "Dune", "price": 9.99 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["category"], category.id);
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["description"], "");
    assert_eq!(json["price"], 9.99);
    assert_eq!(json["status"], true);
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());

    let id = json["id"].as_i64().unwrap();
    let response = get_auth(app.app(), &format!("/product/{id}/"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Dune");
}

#[tokio::test]
async fn unknown_category_is_a_validation_error() {
    let app = common::build_test_app();
    let token = app.token().await;

    let response = post_json_auth(
        app.app(),
        "/product/",
        json!({ "category": 77, "title": "Orphan", "price": 1.0 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("category"));
}

#[tokio::test]
async fn field_rules_are_validated() {
    let app = common::build_test_app();
    let token = app.token().await;
    let category = create_category(&app.store, "Books").await;

    let response = post_json_auth(
        app.app(),
        "/product/",
        json!({ "category": category.id, "title": "Cheap", "price": -1.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(
        app.app(),
        "/product/",
        json!({ "category": category.id, "title": "", "price": 1.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(
        app.app(),
        "/product/",
        json!({ "category": category.id, "title": "Odd", "price": 9.999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_category_is_a_bad_request() {
    let app = common::build_test_app();
    let token = app.token().await;

    let response = post_json_auth(
        app.app(),
        "/product/",
        json!({ "title": "No category", "price": 1.0 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = common::build_test_app();
    let token = app.token().await;

    let response = send_raw(
        app.app(),
        Method::POST,
        "/product/",
        Some(&token),
        Some("{not json".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let app = common::build_test_app();
    let token = app.token().await;
    let books = create_category(&app.store, "Books").await;
    let product = create_product(&app.store, books.id, "Dune", 9.99).await;
    let uri = format!("/product/{}/", product.id);

    let response = patch_json_auth(
        app.app(),
        &uri,
        json!({ "price": 12.5, "status": false }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["category"], books.id);
    assert_eq!(json["price"], 12.5);
    assert_eq!(json["status"], false);
}

#[tokio::test]
async fn patch_to_unknown_category_is_a_validation_error() {
    let app = common::build_test_app();
    let token = app.token().await;
    let books = create_category(&app.store, "Books").await;
    let product = create_product(&app.store, books.id, "Dune", 9.99).await;

    let response = patch_json_auth(
        app.app(),
        &format!("/product/{}/", product.id),
        json!({ "category": 999 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn put_replaces_every_field() {
    let app = common::build_test_app();
    let token = app.token().await;
    let books = create_category(&app.store, "Books").await;
    let films = create_category(&app.store, "Films").await;
    let product = create_product(&app.store, books.id, "Dune", 9.99).await;
    let uri = format!("/product/{}/", product.id);

    patch_json_auth(app.app(), &uri, json!({ "status": false }), &token).await;

    let response = put_json_auth(
        app.app(),
        &uri,
        json!({
            "category": films.id,
            "title": "Dune (1984)",
            "description": "Film",
            "price": 5.0,
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["category"], films.id);
    assert_eq!(json["title"], "Dune (1984)");
    assert_eq!(json["description"], "Film");
    assert_eq!(json["price"], 5.0);
    assert_eq!(json["status"], true);
}

#[tokio::test]
async fn deleted_product_disappears_from_list() {
    let app = common::build_test_app();
    let token = app.token().await;
    let books = create_category(&app.store, "Books").await;
    let first = create_product(&app.store, books.id, "Dune", 9.99).await;
    let second = create_product(&app.store, books.id, "Emma", 4.5).await;

    let response = delete_auth(app.app(), &format!("/product/{}/", first.id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get_auth(app.app(), "/product/", &token).await).await;
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [second.id]);

    let response = delete_auth(app.app(), &format!("/product/{}/", first.id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_id_is_not_found_for_read_and_update() {
    let app = common::build_test_app();
    let token = app.token().await;

    let response = get_auth(app.app(), "/product/999/", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let body = json!({ "category": 999, "title": "Ghost", "price": 1.0 });
    let response = put_json_auth(app.app(), "/product/999/", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let body = json!({ "category": 999 });
    let response = patch_json_auth(app.app(), "/product/999/", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_id_is_a_json_bad_request() {
    let app = common::build_test_app();
    let token = app.token().await;

    let response = get_auth(app.app(), "/product/abc/", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("abc"));
}
