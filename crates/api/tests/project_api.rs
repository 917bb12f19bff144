//! Integration tests for the `/projects` HTTP contract.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_status, get_auth, post_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_returns_201_and_echoes_fields(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        Some(&token),
        json!({
            "name": "Glasfaser Nord",
            "customer": "Stadtwerke Berlin",
            "city": "Berlin",
            "total_length_m": 1500.0,
            "base_rate_per_m": 22.5
        }),
    )
    .await;

    let json = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(json["name"], "Glasfaser Nord");
    assert_eq!(json["customer"], "Stadtwerke Berlin");
    assert_eq!(json["total_length_m"], 1500.0);
    assert_eq!(json["status"], "draft");
    // Budget is derived, not stored.
    assert_eq!(json["budget"], 33750.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_with_empty_name_returns_400(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        Some(&token),
        json!({"name": "  ", "total_length_m": 10.0, "base_rate_per_m": 1.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_requires_manager_role(pool: PgPool) {
    let (_, token) = seed_user(&pool, "worker", "worker@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        Some(&token),
        json!({"name": "Should fail"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn fetch_missing_project_returns_404(pool: PgPool) {
    let (_, token) = seed_user(&pool, "viewer", "viewer@example.com").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/projects/999999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn pagination_produces_expected_slice_and_total_pages(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;

    for i in 0..5 {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/projects",
            Some(&token),
            json!({"name": format!("Projekt {i}")}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/projects?page=2&per_page=2", &token).await;
    let json = expect_status(response, StatusCode::OK).await;

    assert_eq!(json["total"], 5);
    assert_eq!(json["page"], 2);
    assert_eq!(json["per_page"], 2);
    // total_pages = ceil(5 / 2) = 3
    assert_eq!(json["total_pages"], 3);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_project_with_work_entries_returns_409(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        Some(&token),
        json!({"name": "Mit Arbeit"}),
    )
    .await;
    let project = expect_status(response, StatusCode::CREATED).await;
    let project_id = project["id"].as_i64().unwrap();

    // Log a work entry against the project.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/work-entries",
        Some(&token),
        json!({
            "project_id": project_id,
            "work_date": "2025-06-02",
            "stage_code": "stage_2_excavation",
            "meters_done_m": 42.0
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn project_summary_reports_derived_figures(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        Some(&token),
        json!({"name": "Summiert", "total_length_m": 1000.0, "base_rate_per_m": 10.0}),
    )
    .await;
    let project = expect_status(response, StatusCode::CREATED).await;
    let project_id = project["id"].as_i64().unwrap();

    // One approved entry (250 m) and one pending entry (100 m).
    for (meters, approve) in [(250.0, true), (100.0, false)] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/work-entries",
            Some(&token),
            json!({
                "project_id": project_id,
                "work_date": "2025-06-03",
                "stage_code": "stage_4_cable",
                "meters_done_m": meters
            }),
        )
        .await;
        let entry = expect_status(response, StatusCode::CREATED).await;
        if approve {
            let app = common::build_test_app(pool.clone());
            let response = post_json(
                app,
                &format!("/api/v1/work-entries/{}/approve", entry["id"]),
                Some(&token),
                json!({}),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/projects/{project_id}/summary"), &token).await;
    let json = expect_status(response, StatusCode::OK).await;

    // Only the approved 250 m count.
    assert_eq!(json["meters_done_m"], 250.0);
    assert_eq!(json["progress_percent"], 25.0);
    assert_eq!(json["budget"], 10000.0);
    assert_eq!(json["spent"], 2500.0);
}
