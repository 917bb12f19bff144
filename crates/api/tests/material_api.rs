//! Integration tests for the `/materials` HTTP contract: stock adjustment
//! and allocation conflicts.

mod common;

use axum::http::StatusCode;
use common::{expect_status, get_auth, post_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

async fn seed_material(pool: &PgPool, token: &str, name: &str, stock: f64) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/materials",
        Some(token),
        json!({
            "name": name,
            "category": "conduit",
            "unit": "meter",
            "unit_cost": 1.2,
            "current_stock_qty": stock,
            "min_stock_level": 50.0
        }),
    )
    .await;
    let material = expect_status(response, StatusCode::CREATED).await;
    material["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn adjust_stock_returns_old_and_new_quantity(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;
    let material_id = seed_material(&pool, &token, "DN50", 200.0).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/materials/{material_id}/adjust"),
        Some(&token),
        json!({"quantity": -60.0, "reason": "delivered to site"}),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;

    assert_eq!(json["old_quantity"], 200.0);
    assert_eq!(json["new_quantity"], 140.0);
    assert_eq!(json["adjustment"], -60.0);

    // The movement history records the adjustment.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/materials/{material_id}/moves"), &token).await;
    let moves = expect_status(response, StatusCode::OK).await;
    assert_eq!(moves[0]["move_type"], "adjust");
    assert_eq!(moves[0]["quantity"], -60.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn adjust_without_reason_returns_400(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;
    let material_id = seed_material(&pool, &token, "Tape", 10.0).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/materials/{material_id}/adjust"),
        Some(&token),
        json!({"quantity": 5.0, "reason": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn over_allocation_returns_409(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;
    let material_id = seed_material(&pool, &token, "Fiber", 100.0).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        Some(&token),
        json!({"name": "Zuteilung"}),
    )
    .await;
    let project = expect_status(response, StatusCode::CREATED).await;
    let project_id = project["id"].as_i64().unwrap();

    // First allocation within stock succeeds.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/materials/allocations",
        Some(&token),
        json!({
            "material_id": material_id,
            "project_id": project_id,
            "allocated_qty": 80.0
        }),
    )
    .await;
    let allocation = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(allocation["allocated_qty"], 80.0);

    // Second allocation exceeds the remaining 20.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/materials/allocations",
        Some(&token),
        json!({
            "material_id": material_id,
            "project_id": project_id,
            "allocated_qty": 30.0
        }),
    )
    .await;
    let json = expect_status(response, StatusCode::CONFLICT).await;
    assert!(json["error"].as_str().unwrap().contains("Insufficient stock"));

    // Reserved stock is visible on the material.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/materials/{material_id}"), &token).await;
    let material = expect_status(response, StatusCode::OK).await;
    assert_eq!(material["reserved_qty"], 80.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn low_stock_listing(pool: PgPool) {
    let (_, token) = seed_user(&pool, "pm", "pm@example.com").await;
    // min_stock_level is 50 in the seeder; 20 < 50 triggers the listing.
    seed_material(&pool, &token, "Knapp", 20.0).await;
    seed_material(&pool, &token, "Reichlich", 500.0).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/materials/low-stock", &token).await;
    let json = expect_status(response, StatusCode::OK).await;

    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Knapp"));
    assert!(!names.contains(&"Reichlich"));
}
