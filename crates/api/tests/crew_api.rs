//! Integration tests for the `/crews` HTTP contract.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_status, get_auth, post_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn crew_lifecycle_with_members(pool: PgPool) {
    let (foreman, token) = seed_user(&pool, "foreman", "foreman@example.com").await;
    let (worker, _) = seed_user(&pool, "worker", "worker@example.com").await;

    // Create a crew led by the foreman.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/crews",
        Some(&token),
        json!({"name": "Kolonne 1", "foreman_user_id": foreman.id}),
    )
    .await;
    let crew = expect_status(response, StatusCode::CREATED).await;
    let crew_id = crew["id"].as_i64().unwrap();
    assert_eq!(crew["member_count"], 0);

    // Add both users as members.
    for user_id in [foreman.id, worker.id] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/v1/crews/{crew_id}/members"),
            Some(&token),
            json!({"user_id": user_id}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/crews/{crew_id}/members"), &token).await;
    let members = expect_status(response, StatusCode::OK).await;
    assert_eq!(members.as_array().unwrap().len(), 2);

    // Deleting the crew removes its member rows.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/crews/{crew_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM crew_members WHERE crew_id = $1")
            .bind(crew_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0, "crew member rows must be cleaned up");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn adding_member_twice_returns_409(pool: PgPool) {
    let (user, token) = seed_user(&pool, "foreman", "foreman@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/crews",
        Some(&token),
        json!({"name": "Kolonne 2"}),
    )
    .await;
    let crew = expect_status(response, StatusCode::CREATED).await;
    let crew_id = crew["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/crews/{crew_id}/members"),
        Some(&token),
        json!({"user_id": user.id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/crews/{crew_id}/members"),
        Some(&token),
        json!({"user_id": user.id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clearing_foreman_with_null(pool: PgPool) {
    let (foreman, token) = seed_user(&pool, "foreman", "foreman@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/crews",
        Some(&token),
        json!({"name": "Kolonne 3", "foreman_user_id": foreman.id}),
    )
    .await;
    let crew = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(crew["foreman_user_id"], foreman.id);

    // An explicit null clears the foreman; an absent field would leave it.
    let app = common::build_test_app(pool);
    let response = common::put_json(
        app,
        &format!("/api/v1/crews/{}", crew["id"]),
        Some(&token),
        json!({"foreman_user_id": null}),
    )
    .await;
    let updated = expect_status(response, StatusCode::OK).await;
    assert!(updated["foreman_user_id"].is_null());
    assert!(updated["foreman_name"].is_null());
}
