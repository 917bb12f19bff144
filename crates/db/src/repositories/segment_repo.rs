//! Repository for the `segments` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::segment::{CreateSegment, Segment, UpdateSegment};

const COLUMNS: &str = "id, cabinet_id, name, length_planned_m, surface, area, depth_req_m, \
                        width_req_m, status, created_at";

/// Provides CRUD operations for segments.
pub struct SegmentRepo;

impl SegmentRepo {
    /// Insert a new segment under a cabinet, returning the created row.
    ///
    /// Surface defaults to `asphalt`, area to `roadway`.
    pub async fn create(
        pool: &PgPool,
        cabinet_id: DbId,
        input: &CreateSegment,
    ) -> Result<Segment, sqlx::Error> {
        let query = format!(
            "INSERT INTO segments (cabinet_id, name, length_planned_m, surface, area,
                                   depth_req_m, width_req_m)
             VALUES ($1, $2, $3, COALESCE($4, 'asphalt'), COALESCE($5, 'roadway'), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Segment>(&query)
            .bind(cabinet_id)
            .bind(&input.name)
            .bind(input.length_planned_m)
            .bind(&input.surface)
            .bind(&input.area)
            .bind(input.depth_req_m)
            .bind(input.width_req_m)
            .fetch_one(pool)
            .await
    }

    /// Find a segment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Segment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM segments WHERE id = $1");
        sqlx::query_as::<_, Segment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all segments for a cabinet, in insertion order.
    pub async fn list_by_cabinet(
        pool: &PgPool,
        cabinet_id: DbId,
    ) -> Result<Vec<Segment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM segments WHERE cabinet_id = $1 ORDER BY id");
        sqlx::query_as::<_, Segment>(&query)
            .bind(cabinet_id)
            .fetch_all(pool)
            .await
    }

    /// Update a segment. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSegment,
    ) -> Result<Option<Segment>, sqlx::Error> {
        let query = format!(
            "UPDATE segments SET
                name = COALESCE($2, name),
                length_planned_m = COALESCE($3, length_planned_m),
                surface = COALESCE($4, surface),
                area = COALESCE($5, area),
                depth_req_m = COALESCE($6, depth_req_m),
                width_req_m = COALESCE($7, width_req_m),
                status = COALESCE($8, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Segment>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.length_planned_m)
            .bind(&input.surface)
            .bind(&input.area)
            .bind(input.depth_req_m)
            .bind(input.width_req_m)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a segment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM segments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
