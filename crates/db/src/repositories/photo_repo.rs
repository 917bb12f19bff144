//! Repository for the `photos` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::photo::{NewPhoto, Photo};

const COLUMNS: &str = "id, work_entry_id, file_path, taken_at, gps_lat, gps_lon, label, \
                        author_user_id, created_at";

/// Provides insert and list operations for work-entry photos.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Insert a photo record, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewPhoto) -> Result<Photo, sqlx::Error> {
        let query = format!(
            "INSERT INTO photos (work_entry_id, file_path, gps_lat, gps_lon, label, author_user_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(input.work_entry_id)
            .bind(&input.file_path)
            .bind(input.gps_lat)
            .bind(input.gps_lon)
            .bind(&input.label)
            .bind(input.author_user_id)
            .fetch_one(pool)
            .await
    }

    /// List all photos for a work entry, oldest first.
    pub async fn list_by_work_entry(
        pool: &PgPool,
        work_entry_id: DbId,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photos WHERE work_entry_id = $1 ORDER BY id");
        sqlx::query_as::<_, Photo>(&query)
            .bind(work_entry_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a photo record. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
