//! Article endpoint integration tests.
//!
//! Run with: `cargo test -p kinarc-api --test articles_test`.
//! Requires `TEST_DATABASE_URL` pointing at a disposable Postgres.

mod helpers;

use helpers::auth::{bearer, test_user};
use helpers::setup_test_app;

#[tokio::test]
async fn create_article_derives_slug_and_embeds_author() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    let response = client
        .post("/api/articles")
        .add_header("Authorization", bearer(&user))
        .json(&serde_json::json!({
            "title": "  Summer at the Lake House  ",
            "description": "Photos and notes from July",
            "content": "We spent two weeks at the lake...",
            "tags": ["summer", "travel"],
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: serde_json::Value = response.json();
    assert_eq!(json["slug"], "summer-at-the-lake-house");
    assert_eq!(json["title"], "Summer at the Lake House");
    assert_eq!(json["author"]["email"], "taro@example.com");

    let fetched = client.get("/api/articles/summer-at-the-lake-house").await;
    assert_eq!(fetched.status_code(), 200);
    let fetched_json: serde_json::Value = fetched.json();
    assert_eq!(fetched_json["id"], json["id"]);
}

#[tokio::test]
async fn create_article_rejects_blank_title_and_content() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    for body in [
        serde_json::json!({ "title": "   ", "content": "text" }),
        serde_json::json!({ "title": "Ok title", "content": "" }),
        serde_json::json!({ "title": "!!!", "content": "text" }),
    ] {
        let response = client
            .post("/api/articles")
            .add_header("Authorization", bearer(&user))
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 400);
    }
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    let body = serde_json::json!({ "title": "Family Recipes", "content": "Grandma's curry." });
    let first = client
        .post("/api/articles")
        .add_header("Authorization", bearer(&user))
        .json(&body)
        .await;
    assert_eq!(first.status_code(), 201);

    let second = client
        .post("/api/articles")
        .add_header("Authorization", bearer(&user))
        .json(&body)
        .await;
    assert_eq!(second.status_code(), 409);
    let json: serde_json::Value = second.json();
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn listing_and_reading_articles_is_public() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let client = app.client();
    let user = test_user();

    for title in ["First Post", "Second Post"] {
        let response = client
            .post("/api/articles")
            .add_header("Authorization", bearer(&user))
            .json(&serde_json::json!({ "title": title, "content": "body" }))
            .await;
        assert_eq!(response.status_code(), 201);
    }

    let listed = client.get("/api/articles").await;
    assert_eq!(listed.status_code(), 200);
    let json: serde_json::Value = listed.json();
    let slugs: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["second-post", "first-post"]);
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let response = app.client().get("/api/articles/no-such-article").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn create_article_requires_session() {
    let Some(app) = setup_test_app().await else {
        return;
    };
    let response = app
        .client()
        .post("/api/articles")
        .json(&serde_json::json!({ "title": "T", "content": "c" }))
        .await;
    assert_eq!(response.status_code(), 401);
}
