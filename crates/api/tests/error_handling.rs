//! Integration tests for cross-cutting error behaviour: authentication
//! rejections and the JSON error envelope.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn garbage_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/projects", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_route_with_worker_token_returns_403(pool: PgPool) {
    let (_, token) = seed_user(&pool, "worker", "worker@example.com").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn not_found_uses_error_envelope(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/work-entries/424242", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("424242"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_maps_to_409(pool: PgPool) {
    let (_, admin_token) = seed_user(&pool, "admin", "admin@example.com").await;

    let body = json!({
        "first_name": "Doppel",
        "last_name": "Gänger",
        "email": "dup@example.com",
        "pin_code": "1234"
    });

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/users", Some(&admin_token), body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/users", Some(&admin_token), body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}
