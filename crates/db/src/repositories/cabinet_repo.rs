//! Repository for the `cabinets` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::cabinet::{Cabinet, CreateCabinet, UpdateCabinet};

const COLUMNS: &str = "id, project_id, code, name, address, gps_lat, gps_lon, created_at";

/// Provides CRUD operations for cabinets.
pub struct CabinetRepo;

impl CabinetRepo {
    /// Insert a new cabinet under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateCabinet,
    ) -> Result<Cabinet, sqlx::Error> {
        let query = format!(
            "INSERT INTO cabinets (project_id, code, name, address, gps_lat, gps_lon)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cabinet>(&query)
            .bind(project_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.address)
            .bind(input.gps_lat)
            .bind(input.gps_lon)
            .fetch_one(pool)
            .await
    }

    /// Find a cabinet by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Cabinet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cabinets WHERE id = $1");
        sqlx::query_as::<_, Cabinet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all cabinets for a project, ordered by code.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Cabinet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cabinets WHERE project_id = $1 ORDER BY code NULLS LAST, id"
        );
        sqlx::query_as::<_, Cabinet>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a cabinet. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCabinet,
    ) -> Result<Option<Cabinet>, sqlx::Error> {
        let query = format!(
            "UPDATE cabinets SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                address = COALESCE($4, address),
                gps_lat = COALESCE($5, gps_lat),
                gps_lon = COALESCE($6, gps_lon)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cabinet>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.address)
            .bind(input.gps_lat)
            .bind(input.gps_lon)
            .fetch_optional(pool)
            .await
    }

    /// Delete a cabinet (segments cascade). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cabinets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
