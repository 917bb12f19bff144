//! Repository for the `readiness_items` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::readiness::{CreateReadinessItem, ReadinessItem, UpdateReadinessItem};

const COLUMNS: &str = "id, project_id, category, title, required, completed, completed_at, \
                        note, created_at";

/// Provides CRUD operations for the per-project readiness checklist.
pub struct ReadinessRepo;

impl ReadinessRepo {
    /// Insert a checklist item under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateReadinessItem,
    ) -> Result<ReadinessItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO readiness_items (project_id, category, title, required, note)
             VALUES ($1, $2, $3, COALESCE($4, true), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReadinessItem>(&query)
            .bind(project_id)
            .bind(&input.category)
            .bind(&input.title)
            .bind(input.required)
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    /// List all checklist items for a project, grouped by category in the
    /// returned order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ReadinessItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM readiness_items \
             WHERE project_id = $1 ORDER BY category, id"
        );
        sqlx::query_as::<_, ReadinessItem>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a checklist item. Toggling `completed` stamps or clears
    /// `completed_at` accordingly.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReadinessItem,
    ) -> Result<Option<ReadinessItem>, sqlx::Error> {
        let query = format!(
            "UPDATE readiness_items SET
                category = COALESCE($2, category),
                title = COALESCE($3, title),
                required = COALESCE($4, required),
                completed = COALESCE($5, completed),
                completed_at = CASE
                    WHEN $5 IS TRUE THEN NOW()
                    WHEN $5 IS FALSE THEN NULL
                    ELSE completed_at
                END,
                note = COALESCE($6, note)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReadinessItem>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(&input.title)
            .bind(input.required)
            .bind(input.completed)
            .bind(&input.note)
            .fetch_optional(pool)
            .await
    }

    /// Delete a checklist item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM readiness_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count `(completed_required, total_required)` items for a project.
    pub async fn required_counts(pool: &PgPool, project_id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*) FILTER (WHERE completed)::BIGINT, COUNT(*)::BIGINT
             FROM readiness_items
             WHERE project_id = $1 AND required",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
