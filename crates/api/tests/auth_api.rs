//! Integration tests for login, token refresh, and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, expect_status, post_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_correct_pin_returns_tokens_and_user(pool: PgPool) {
    let (user, _) = seed_user(&pool, "pm", "login@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        json!({"email": "login@example.com", "pin_code": "2468"}),
    )
    .await;

    let json = expect_status(response, StatusCode::OK).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "pm");
    // The PIN hash must never appear in responses.
    assert!(json["user"].get("pin_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_pin_returns_401(pool: PgPool) {
    seed_user(&pool, "worker", "wrongpin@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        json!({"email": "wrongpin@example.com", "pin_code": "0000"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_without_identifier_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/login", None, json!({"pin_code": "2468"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_locks_account_after_repeated_failures(pool: PgPool) {
    seed_user(&pool, "worker", "lockout@example.com").await;

    // Five wrong attempts trigger the lock.
    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/auth/login",
            None,
            json!({"email": "lockout@example.com", "pin_code": "9999"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct PIN is now rejected with 403 while locked.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        json!({"email": "lockout@example.com", "pin_code": "2468"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_tokens(pool: PgPool) {
    seed_user(&pool, "pm", "refresh@example.com").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        None,
        json!({"email": "refresh@example.com", "pin_code": "2468"}),
    )
    .await;
    let login_body = body_json(login).await;
    let refresh_token = login_body["refresh_token"].as_str().unwrap().to_string();

    // First refresh succeeds and returns a new pair.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        None,
        json!({"refresh_token": refresh_token}),
    )
    .await;
    let refreshed = expect_status(response, StatusCode::OK).await;
    assert_ne!(refreshed["refresh_token"], login_body["refresh_token"]);

    // The old refresh token is revoked; replaying it fails.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        None,
        json!({"refresh_token": login_body["refresh_token"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_all_sessions(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "logout@example.com").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        None,
        json!({"email": "logout@example.com", "pin_code": "2468"}),
    )
    .await;
    let login_body = body_json(login).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/auth/logout", Some(&token), json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The session created at login no longer refreshes.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        None,
        json!({"refresh_token": login_body["refresh_token"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
