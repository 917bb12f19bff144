//! Repository for the `crews` and `crew_members` tables.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::crew::{Crew, CrewMember, CreateCrew, UpdateCrew};

/// Crews are always read joined with the foreman's name and member count.
const COLUMNS: &str = "c.id, c.project_id, c.name, c.foreman_user_id, \
                        CASE WHEN f.id IS NULL THEN NULL \
                             ELSE f.first_name || ' ' || f.last_name END AS foreman_name, \
                        (SELECT COUNT(*)::BIGINT FROM crew_members cm \
                          WHERE cm.crew_id = c.id) AS member_count, \
                        c.created_at, c.updated_at";

const FROM: &str = "FROM crews c LEFT JOIN users f ON c.foreman_user_id = f.id";

const MEMBER_COLUMNS: &str = "cm.id, cm.crew_id, cm.user_id, \
                               u.first_name || ' ' || u.last_name AS user_name, \
                               u.role AS user_role, cm.created_at";

/// Provides CRUD operations for crews and their membership.
pub struct CrewRepo;

impl CrewRepo {
    /// Insert a new crew, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCrew) -> Result<Crew, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO crews (name, project_id, foreman_user_id)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.project_id)
        .bind(input.foreman_user_id)
        .fetch_one(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} {FROM} WHERE c.id = $1");
        sqlx::query_as::<_, Crew>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a crew by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Crew>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE c.id = $1");
        sqlx::query_as::<_, Crew>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List crews, optionally restricted to one project.
    pub async fn list(pool: &PgPool, project_id: Option<DbId>) -> Result<Vec<Crew>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM} \
             WHERE ($1::BIGINT IS NULL OR c.project_id = $1) \
             ORDER BY c.name"
        );
        sqlx::query_as::<_, Crew>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a crew. `project_id`/`foreman_user_id` are three-state: absent
    /// leaves the value, `Some(None)` clears it, `Some(Some(v))` sets it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCrew,
    ) -> Result<Option<Crew>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE crews SET
                name = COALESCE($2, name),
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                foreman_user_id = CASE WHEN $5 THEN $6 ELSE foreman_user_id END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.project_id.is_some())
        .bind(input.project_id.flatten())
        .bind(input.foreman_user_id.is_some())
        .bind(input.foreman_user_id.flatten())
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete a crew and its member rows in one transaction.
    ///
    /// Returns `true` if the crew existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM crew_members WHERE crew_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM crews WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the members of a crew with their names.
    pub async fn list_members(pool: &PgPool, crew_id: DbId) -> Result<Vec<CrewMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM crew_members cm \
             JOIN users u ON cm.user_id = u.id \
             WHERE cm.crew_id = $1 \
             ORDER BY cm.id"
        );
        sqlx::query_as::<_, CrewMember>(&query)
            .bind(crew_id)
            .fetch_all(pool)
            .await
    }

    /// Add a user to a crew, returning the created membership row.
    ///
    /// A duplicate membership violates `uq_crew_members_crew_user` (maps to
    /// 409 at the API layer).
    pub async fn add_member(
        pool: &PgPool,
        crew_id: DbId,
        user_id: DbId,
    ) -> Result<CrewMember, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO crew_members (crew_id, user_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(crew_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM crew_members cm \
             JOIN users u ON cm.user_id = u.id \
             WHERE cm.id = $1"
        );
        sqlx::query_as::<_, CrewMember>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Remove a user from a crew. Returns `true` if a membership was removed.
    pub async fn remove_member(
        pool: &PgPool,
        crew_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM crew_members WHERE crew_id = $1 AND user_id = $2")
            .bind(crew_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count remaining member rows for a crew (used by tests to verify
    /// referential cleanup).
    pub async fn member_count(pool: &PgPool, crew_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM crew_members WHERE crew_id = $1",
        )
        .bind(crew_id)
        .fetch_one(pool)
        .await
    }
}
