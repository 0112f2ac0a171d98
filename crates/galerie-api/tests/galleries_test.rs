//! Gallery API integration tests.
//!
//! Run with: `cargo test -p galerie-api --test galleries_test`

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures;
use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_and_list_galleries() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/api/galleries")
        .json(&json!({ "name": "holiday" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["name"], "holiday");
    assert_eq!(created["images"], json!([]));
    assert!(created["preview"].is_null());

    let response = client.get("/api/galleries").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let listed: Value = response.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert!(listed[0].get("images").is_none());
}

#[tokio::test]
async fn test_create_rejects_bad_names() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/api/galleries")
        .json(&json!({ "name": "ab" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    let response = client
        .post("/api/galleries")
        .json(&json!({ "name": "gallery" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = client
        .post("/api/galleries")
        .json(&json!({ "name": "a-name-that-is-too-long" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = client.post("/api/galleries").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let app = setup_test_app().await;
    let client = app.client();

    client
        .post("/api/galleries")
        .json(&json!({ "name": "holiday" }))
        .await;
    let response = client
        .post("/api/galleries")
        .json(&json!({ "name": "holiday" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "DUPLICATE_NAME");
}

#[tokio::test]
async fn test_rename_gallery() {
    let app = setup_test_app().await;
    let client = app.client();

    let first: Value = client
        .post("/api/galleries")
        .json(&json!({ "name": "holiday" }))
        .await
        .json();
    client
        .post("/api/galleries")
        .json(&json!({ "name": "work" }))
        .await;
    let id = first["id"].as_str().unwrap();

    let response = client
        .put(&format!("/api/galleries/{}", id))
        .json(&json!({ "name": "work" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = client
        .put(&format!("/api/galleries/{}", id))
        .json(&json!({ "name": "summer" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let renamed: Value = response.json();
    assert_eq!(renamed["name"], "summer");

    let response = client
        .put(&format!("/api/galleries/{}", uuid::Uuid::new_v4()))
        .json(&json!({ "name": "autumn" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preview_metadata_and_bytes() {
    let app = setup_test_app().await;
    let client = app.client();

    let gallery: Value = client
        .post("/api/galleries")
        .json(&json!({ "name": "holiday" }))
        .await
        .json();
    let id = gallery["id"].as_str().unwrap();
    let path = format!("/api/galleries/{}", id);

    // Empty gallery serves the default image
    let response = client.get(&path).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/jpeg");
    let default = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!((default.width(), default.height()), (640, 480));

    let upload: Value = client
        .post("/api/galleries/images/holiday")
        .multipart(fixtures::upload_form(
            "beach.jpg",
            "image/jpeg",
            fixtures::jpeg(800, 600),
        ))
        .await
        .json();

    let response = client.get(&path).add_query_param("image", false).await;
    let detail: Value = response.json();
    assert_eq!(detail["preview"]["id"], upload["id"]);
    assert_eq!(detail["images"].as_array().unwrap().len(), 1);

    let response = client.get(&path).add_query_param("width", 400).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let thumb = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (400, 300));
}

#[tokio::test]
async fn test_preview_rejects_bad_size_and_id() {
    let app = setup_test_app().await;
    let client = app.client();

    let gallery: Value = client
        .post("/api/galleries")
        .json(&json!({ "name": "holiday" }))
        .await
        .json();
    let path = format!("/api/galleries/{}", gallery["id"].as_str().unwrap());

    let response = client.get(&path).add_query_param("width", 100).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = client.get(&path).add_query_param("width", "wide").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = client.get("/api/galleries/not-a-uuid").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = client
        .get(&format!("/api/galleries/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_gallery_removes_files() {
    let app = setup_test_app().await;
    let client = app.client();

    let gallery: Value = client
        .post("/api/galleries")
        .json(&json!({ "name": "holiday" }))
        .await
        .json();
    for name in ["one.jpg", "two.jpg"] {
        client
            .post("/api/galleries/images/holiday")
            .multipart(fixtures::upload_form(name, "image/jpeg", fixtures::jpeg(300, 300)))
            .await;
    }
    assert!(app.file_exists("one.jpg"));

    let response = client
        .delete(&format!("/api/galleries/{}", gallery["id"].as_str().unwrap()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let removed: Value = response.json();
    assert_eq!(removed["images"].as_array().unwrap().len(), 2);

    app.settle().await;
    assert!(!app.file_exists("one.jpg"));
    assert!(!app.file_exists("two.jpg"));

    let response = client.get("/api/galleries/images/holiday").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_docs() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["document_store"], "healthy");

    let response = client.get("/live").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = client.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"].get("/api/galleries").is_some());
}
