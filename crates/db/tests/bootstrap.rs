//! Smoke tests for pool bootstrap and schema conventions.

use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn health_check_succeeds(pool: PgPool) {
    cometa_db::health_check(&pool)
        .await
        .expect("health check should pass on a fresh database");
}

#[sqlx::test(migrations = "./migrations")]
async fn core_tables_exist(pool: PgPool) {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = 'public'",
    )
    .fetch_all(&pool)
    .await
    .expect("listing tables should succeed");

    for expected in [
        "users",
        "sessions",
        "projects",
        "cabinets",
        "segments",
        "crews",
        "crew_members",
        "work_entries",
        "photos",
        "suppliers",
        "materials",
        "material_moves",
        "material_allocations",
        "material_orders",
        "material_order_items",
        "equipment",
        "equipment_assignments",
        "utility_contacts",
        "facilities",
        "housing_units",
        "project_plans",
        "readiness_items",
        "activity_logs",
        "notifications",
    ] {
        assert!(
            tables.iter().any(|t| t == expected),
            "expected table {expected} to exist"
        );
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn unique_constraints_use_uq_prefix(pool: PgPool) {
    // The API layer maps 23505 violations on uq_* constraints to 409, so
    // every unique constraint must follow the naming convention.
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT conname FROM pg_constraint WHERE contype = 'u' AND connamespace = 'public'::regnamespace",
    )
    .fetch_all(&pool)
    .await
    .expect("listing constraints should succeed");

    for name in &names {
        assert!(
            name.starts_with("uq_"),
            "unique constraint {name} must start with uq_"
        );
    }
}
