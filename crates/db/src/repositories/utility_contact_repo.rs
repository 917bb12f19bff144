//! Repository for the `utility_contacts` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::preparation::{CreateUtilityContact, UpdateUtilityContact, UtilityContact};

const COLUMNS: &str = "id, project_id, kind, organization, phone, email, notes, created_at";

/// Provides CRUD operations for per-project utility contacts.
pub struct UtilityContactRepo;

impl UtilityContactRepo {
    /// Insert a contact under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateUtilityContact,
    ) -> Result<UtilityContact, sqlx::Error> {
        let query = format!(
            "INSERT INTO utility_contacts (project_id, kind, organization, phone, email, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UtilityContact>(&query)
            .bind(project_id)
            .bind(&input.kind)
            .bind(&input.organization)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List all contacts for a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<UtilityContact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM utility_contacts WHERE project_id = $1 ORDER BY organization"
        );
        sqlx::query_as::<_, UtilityContact>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a contact. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUtilityContact,
    ) -> Result<Option<UtilityContact>, sqlx::Error> {
        let query = format!(
            "UPDATE utility_contacts SET
                kind = COALESCE($2, kind),
                organization = COALESCE($3, organization),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                notes = COALESCE($6, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UtilityContact>(&query)
            .bind(id)
            .bind(&input.kind)
            .bind(&input.organization)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a contact. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM utility_contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count contacts for a project (preparation summary).
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM utility_contacts WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
