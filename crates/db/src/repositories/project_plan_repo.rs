//! Repository for the `project_plans` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::preparation::{NewProjectPlan, ProjectPlan};

const COLUMNS: &str = "id, project_id, title, filename, file_path, mime_type, size_bytes, \
                        uploaded_by, created_at";

/// Provides insert and list operations for uploaded plan documents.
pub struct ProjectPlanRepo;

impl ProjectPlanRepo {
    /// Insert a plan record, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewProjectPlan) -> Result<ProjectPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_plans (project_id, title, filename, file_path, mime_type,
                                        size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectPlan>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.filename)
            .bind(&input.file_path)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a plan by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_plans WHERE id = $1");
        sqlx::query_as::<_, ProjectPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all plans for a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_plans WHERE project_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectPlan>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a plan record. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count plans for a project (preparation summary).
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM project_plans WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
