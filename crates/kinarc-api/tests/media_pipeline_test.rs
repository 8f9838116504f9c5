//! Media upload pipeline integration tests.
//!
//! Run with: `cargo test -p kinarc-api --test media_pipeline_test`.
//! Requires `TEST_DATABASE_URL` pointing at a disposable Postgres.

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::{bearer, test_user};
use helpers::setup_test_app;
use kinarc_storage::ObjectGateway;
use uuid::Uuid;

#[tokio::test]
async fn health_reports_ok_with_database_check() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["database"], true);
    assert!(json["responseTimeMs"].is_u64());
}

#[tokio::test]
async fn upload_complete_is_idempotent_on_storage_key() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    let body = serde_json::json!({
        "storageKey": "originals/owner/2026/08/abc_photo.jpg",
        "originalFilename": "photo.jpg",
        "fileType": "image/jpeg",
    });

    let first = client
        .post("/api/media/upload-complete")
        .add_header("Authorization", bearer(&user))
        .json(&body)
        .await;
    assert_eq!(first.status_code(), 201);
    let first_json: serde_json::Value = first.json();
    let first_id = first_json["id"].as_str().expect("id in response");
    assert_eq!(first_json["status"], "pending");
    assert_eq!(first_json["originalFilename"], "photo.jpg");

    // Retrying the same key returns the existing record, not an error.
    let second = client
        .post("/api/media/upload-complete")
        .add_header("Authorization", bearer(&user))
        .json(&body)
        .await;
    assert_eq!(second.status_code(), 200);
    let second_json: serde_json::Value = second.json();
    assert_eq!(second_json["id"].as_str(), Some(first_id));
}

#[tokio::test]
async fn upload_complete_requires_storage_key() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    for body in [
        serde_json::json!({}),
        serde_json::json!({ "storageKey": "" }),
    ] {
        let response = client
            .post("/api/media/upload-complete")
            .add_header("Authorization", bearer(&user))
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 400);
        let json: serde_json::Value = response.json();
        assert_eq!(json["code"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn upload_complete_defaults_filename_and_mime() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    let response = client
        .post("/api/media/upload-complete")
        .add_header("Authorization", bearer(&user))
        .json(&serde_json::json!({ "storageKey": "originals/owner/2026/08/xyz_file" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: serde_json::Value = response.json();
    assert_eq!(json["originalFilename"], "upload");
    assert_eq!(json["mimeType"], "application/octet-stream");
}

#[tokio::test]
async fn upload_endpoints_reject_missing_session() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();

    for path in [
        "/api/media/generate-upload-url",
        "/api/media/upload-complete",
        "/api/media/upload-direct",
    ] {
        let response = client.post(path).json(&serde_json::json!({})).await;
        assert_eq!(response.status_code(), 401, "expected 401 for {}", path);
    }
}

#[tokio::test]
async fn upload_endpoints_reject_bad_token() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();

    let response = client
        .post("/api/media/upload-complete")
        .add_header("Authorization", "Bearer not-a-real-token")
        .json(&serde_json::json!({ "storageKey": "k" }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn direct_upload_stores_bytes_and_serves_them_back() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let part = Part::bytes(bytes::Bytes::from(payload.clone()))
        .file_name("holiday photo.png")
        .mime_type("image/png");
    let form = MultipartForm::new().add_part("file", part);

    let upload = client
        .post("/api/media/upload-direct")
        .add_header("Authorization", bearer(&user))
        .multipart(form)
        .await;
    assert_eq!(upload.status_code(), 201);
    let json: serde_json::Value = upload.json();
    let id = json["id"].as_str().expect("id in response");
    let storage_key = json["storageKey"].as_str().expect("storageKey in response");
    assert!(storage_key.starts_with(&format!("originals/{}/", user.id)));
    assert!(storage_key.ends_with("_holiday_photo.png"));
    assert!(app.storage.exists(storage_key).await.unwrap());

    let serve = client.get(&format!("/api/media/{}/image", id)).await;
    assert_eq!(serve.status_code(), 200);
    let headers = serve.headers();
    assert_eq!(
        headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    assert_eq!(
        headers.get("cache-control").and_then(|v| v.to_str().ok()),
        Some("public, max-age=31536000")
    );
    assert_eq!(
        headers
            .get("content-disposition")
            .and_then(|v| v.to_str().ok()),
        Some("inline; filename=\"holiday_photo.png\"")
    );
    assert_eq!(serve.as_bytes().to_vec(), payload);
}

#[tokio::test]
async fn direct_upload_without_file_field_is_rejected() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    let form = MultipartForm::new().add_text("comment", "no file here");
    let response = client
        .post("/api/media/upload-direct")
        .add_header("Authorization", bearer(&user))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn serve_unknown_media_is_not_found() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();

    let response = client
        .get(&format!("/api/media/{}/image", Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn serve_media_with_missing_object_is_not_found() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    // Record exists but nothing was ever written to the store.
    let complete = client
        .post("/api/media/upload-complete")
        .add_header("Authorization", bearer(&user))
        .json(&serde_json::json!({
            "storageKey": "originals/owner/2026/08/ghost_file.jpg",
            "fileType": "image/jpeg",
        }))
        .await;
    assert_eq!(complete.status_code(), 201);
    let json: serde_json::Value = complete.json();
    let id = json["id"].as_str().unwrap();

    let response = client.get(&format!("/api/media/{}/image", id)).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn generate_upload_url_without_signing_backend_is_a_server_error() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    // The in-memory store cannot sign URLs; the handler must surface a
    // configuration error rather than hand out a bogus URL.
    let response = client
        .post("/api/media/generate-upload-url")
        .add_header("Authorization", bearer(&user))
        .json(&serde_json::json!({ "fileName": "a.png", "fileType": "image/png" }))
        .await;
    assert_eq!(response.status_code(), 500);
    let json: serde_json::Value = response.json();
    assert_eq!(json["code"], "CONFIGURATION_ERROR");
}
