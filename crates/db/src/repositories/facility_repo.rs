//! Repository for the `facilities` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::preparation::{CreateFacility, Facility, UpdateFacility};

const COLUMNS: &str = "id, project_id, facility_type, description, rent_from, rent_to, \
                        daily_rate, status, created_at";

/// Provides CRUD operations for per-project site facilities.
pub struct FacilityRepo;

impl FacilityRepo {
    /// Insert a facility under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateFacility,
    ) -> Result<Facility, sqlx::Error> {
        let query = format!(
            "INSERT INTO facilities (project_id, facility_type, description, rent_from, rent_to,
                                     daily_rate, status)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'planned'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Facility>(&query)
            .bind(project_id)
            .bind(&input.facility_type)
            .bind(&input.description)
            .bind(input.rent_from)
            .bind(input.rent_to)
            .bind(input.daily_rate)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// List all facilities for a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Facility>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM facilities WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Facility>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a facility. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFacility,
    ) -> Result<Option<Facility>, sqlx::Error> {
        let query = format!(
            "UPDATE facilities SET
                facility_type = COALESCE($2, facility_type),
                description = COALESCE($3, description),
                rent_from = COALESCE($4, rent_from),
                rent_to = COALESCE($5, rent_to),
                daily_rate = COALESCE($6, daily_rate),
                status = COALESCE($7, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .bind(&input.facility_type)
            .bind(&input.description)
            .bind(input.rent_from)
            .bind(input.rent_to)
            .bind(input.daily_rate)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a facility. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM facilities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count facilities for a project (preparation summary).
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM facilities WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
