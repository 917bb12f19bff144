//! Repository for the `housing_units` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::preparation::{CreateHousingUnit, HousingUnit, UpdateHousingUnit};

const COLUMNS: &str = "id, project_id, address, rooms, beds, occupied_beds, monthly_rent, \
                        status, created_at";

/// Provides CRUD operations for per-project crew housing.
pub struct HousingUnitRepo;

impl HousingUnitRepo {
    /// Insert a housing unit under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateHousingUnit,
    ) -> Result<HousingUnit, sqlx::Error> {
        let query = format!(
            "INSERT INTO housing_units (project_id, address, rooms, beds, monthly_rent, status)
             VALUES ($1, $2, COALESCE($3, 1), COALESCE($4, 1), $5, COALESCE($6, 'available'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HousingUnit>(&query)
            .bind(project_id)
            .bind(&input.address)
            .bind(input.rooms)
            .bind(input.beds)
            .bind(input.monthly_rent)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a housing unit by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HousingUnit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM housing_units WHERE id = $1");
        sqlx::query_as::<_, HousingUnit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all housing units for a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<HousingUnit>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM housing_units WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, HousingUnit>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a housing unit. Returns `None` if no row with the given `id`
    /// exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHousingUnit,
    ) -> Result<Option<HousingUnit>, sqlx::Error> {
        let query = format!(
            "UPDATE housing_units SET
                address = COALESCE($2, address),
                rooms = COALESCE($3, rooms),
                beds = COALESCE($4, beds),
                occupied_beds = COALESCE($5, occupied_beds),
                monthly_rent = COALESCE($6, monthly_rent),
                status = COALESCE($7, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HousingUnit>(&query)
            .bind(id)
            .bind(&input.address)
            .bind(input.rooms)
            .bind(input.beds)
            .bind(input.occupied_beds)
            .bind(input.monthly_rent)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a housing unit. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM housing_units WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count housing units for a project (preparation summary).
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM housing_units WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
