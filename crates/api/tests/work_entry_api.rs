//! Integration tests for the `/work-entries` HTTP contract: creation,
//! validation, approval, and immutability after approval.

mod common;

use axum::http::StatusCode;
use common::{expect_status, post_json, put_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

async fn seed_project(pool: &PgPool, token: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        Some(token),
        json!({"name": "Baustelle", "total_length_m": 500.0, "base_rate_per_m": 20.0}),
    )
    .await;
    let project = expect_status(response, StatusCode::CREATED).await;
    project["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_work_entry_records_author(pool: PgPool) {
    let (pm, token) = seed_user(&pool, "pm", "pm@example.com").await;
    let project_id = seed_project(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/work-entries",
        Some(&token),
        json!({
            "project_id": project_id,
            "work_date": "2025-06-02",
            "stage_code": "stage_3_conduit",
            "meters_done_m": 55.5,
            "method": "trencher"
        }),
    )
    .await;

    let json = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(json["user_id"], pm.id);
    assert_eq!(json["meters_done_m"], 55.5);
    assert!(json["approved_by"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_unknown_stage_code_returns_400(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;
    let project_id = seed_project(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/work-entries",
        Some(&token),
        json!({
            "project_id": project_id,
            "work_date": "2025-06-02",
            "stage_code": "stage_99_magic",
            "meters_done_m": 10.0
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_negative_meters_returns_400(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;
    let project_id = seed_project(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/work-entries",
        Some(&token),
        json!({
            "project_id": project_id,
            "work_date": "2025-06-02",
            "stage_code": "stage_1_marking",
            "meters_done_m": -5.0
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn approving_twice_returns_409(pool: PgPool) {
    let (_, token) = seed_user(&pool, "foreman", "foreman@example.com").await;
    let (_, pm_token) = seed_user(&pool, "pm", "pm@example.com").await;
    let project_id = seed_project(&pool, &pm_token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/work-entries",
        Some(&token),
        json!({
            "project_id": project_id,
            "work_date": "2025-06-02",
            "stage_code": "stage_5_splice",
            "meters_done_m": 12.0
        }),
    )
    .await;
    let entry = expect_status(response, StatusCode::CREATED).await;
    let entry_id = entry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/work-entries/{entry_id}/approve"),
        Some(&token),
        json!({}),
    )
    .await;
    let approved = expect_status(response, StatusCode::OK).await;
    assert!(approved["approved_by"].is_number());
    assert!(approved["approved_at"].is_string());

    // Second approval must be rejected as a conflict.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/work-entries/{entry_id}/approve"),
        Some(&token),
        json!({}),
    )
    .await;
    let json = expect_status(response, StatusCode::CONFLICT).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("already approved"),
        "conflict message should mention already approved"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn worker_cannot_approve(pool: PgPool) {
    let (_, worker_token) = seed_user(&pool, "worker", "worker@example.com").await;
    let (_, pm_token) = seed_user(&pool, "pm", "pm@example.com").await;
    let project_id = seed_project(&pool, &pm_token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/work-entries",
        Some(&worker_token),
        json!({
            "project_id": project_id,
            "work_date": "2025-06-02",
            "stage_code": "stage_6_test",
            "meters_done_m": 8.0
        }),
    )
    .await;
    let entry = expect_status(response, StatusCode::CREATED).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/work-entries/{}/approve", entry["id"]),
        Some(&worker_token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn updating_approved_entry_returns_409(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;
    let project_id = seed_project(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/work-entries",
        Some(&token),
        json!({
            "project_id": project_id,
            "work_date": "2025-06-02",
            "stage_code": "stage_7_connect",
            "meters_done_m": 30.0
        }),
    )
    .await;
    let entry = expect_status(response, StatusCode::CREATED).await;
    let entry_id = entry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/work-entries/{entry_id}/approve"),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/work-entries/{entry_id}"),
        Some(&token),
        json!({"meters_done_m": 99.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
