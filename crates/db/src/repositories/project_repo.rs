//! Repository for the `projects` table.

use cometa_core::progress::{progress_percent, project_budget};
use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    CreateProject, Project, ProjectFilter, ProjectSummary, UpdateProject,
};

/// Column list shared across queries. Projects are always read joined with
/// the PM's name.
const COLUMNS: &str = "p.id, p.name, p.customer, p.city, p.address, p.contact_24h, \
                        p.start_date, p.end_date_plan, p.status, p.total_length_m, \
                        p.base_rate_per_m, p.pm_user_id, p.language_default, \
                        CASE WHEN u.id IS NULL THEN NULL \
                             ELSE u.first_name || ' ' || u.last_name END AS pm_name, \
                        p.created_at, p.updated_at";

const FROM: &str = "FROM projects p LEFT JOIN users u ON p.pm_user_id = u.id";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// `language_default` falls back to `'de'` when omitted.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO projects (name, customer, city, address, contact_24h, start_date,
                                   end_date_plan, total_length_m, base_rate_per_m, pm_user_id,
                                   language_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, 'de'))
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.customer)
        .bind(&input.city)
        .bind(&input.address)
        .bind(&input.contact_24h)
        .bind(input.start_date)
        .bind(input.end_date_plan)
        .bind(input.total_length_m)
        .bind(input.base_rate_per_m)
        .bind(input.pm_user_id)
        .bind(&input.language_default)
        .fetch_one(pool)
        .await?;

        // Re-read through the join so pm_name is populated.
        let query = format!("SELECT {COLUMNS} {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching the filter, most recently started first.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let (where_clause, binds, next_idx) = build_project_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} {FROM} {where_clause} \
             ORDER BY p.start_date DESC NULLS LAST, p.id DESC \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        let q = bind_filter_values(sqlx::query_as::<_, Project>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count projects matching the filter.
    pub async fn count(pool: &PgPool, filter: &ProjectFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_project_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT {FROM} {where_clause}");
        let q = bind_filter_values_scalar(sqlx::query_scalar::<_, i64>(&query), &binds);
        q.fetch_one(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE projects SET
                name = COALESCE($2, name),
                customer = COALESCE($3, customer),
                city = COALESCE($4, city),
                address = COALESCE($5, address),
                contact_24h = COALESCE($6, contact_24h),
                start_date = COALESCE($7, start_date),
                end_date_plan = COALESCE($8, end_date_plan),
                status = COALESCE($9, status),
                total_length_m = COALESCE($10, total_length_m),
                base_rate_per_m = COALESCE($11, base_rate_per_m),
                pm_user_id = COALESCE($12, pm_user_id),
                language_default = COALESCE($13, language_default),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.customer)
        .bind(&input.city)
        .bind(&input.address)
        .bind(&input.contact_24h)
        .bind(input.start_date)
        .bind(input.end_date_plan)
        .bind(&input.status)
        .bind(input.total_length_m)
        .bind(input.base_rate_per_m)
        .bind(input.pm_user_id)
        .bind(&input.language_default)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Permanently delete a project by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count work entries referencing a project (dependency check for delete).
    pub async fn work_entry_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM work_entries WHERE project_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Compute the dashboard summary for a project.
    ///
    /// Returns `None` when the project does not exist. Meters done counts
    /// approved entries only.
    pub async fn summary(pool: &PgPool, id: DbId) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let meters_done: f64 = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT SUM(meters_done_m) FROM work_entries \
             WHERE project_id = $1 AND approved_by IS NOT NULL",
        )
        .bind(id)
        .fetch_one(pool)
        .await?
        .unwrap_or(0.0);

        let crew_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM crews WHERE project_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;

        let open_segment_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM segments s \
             JOIN cabinets c ON s.cabinet_id = c.id \
             WHERE c.project_id = $1 AND s.status <> 'done'",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(Some(ProjectSummary {
            project_id: id,
            meters_done_m: meters_done,
            progress_percent: progress_percent(meters_done, project.total_length_m),
            budget: project_budget(project.total_length_m, project.base_rate_per_m),
            spent: meters_done * project.base_rate_per_m,
            crew_count,
            open_segment_count,
        }))
    }
}

/// Typed bind value for dynamically-built project queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
}

fn build_project_filter(filter: &ProjectFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(ref status) = filter.status {
        conditions.push(format!("p.status = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(status.clone()));
    }

    if let Some(ref search) = filter.search {
        conditions.push(format!(
            "(p.name ILIKE ${bind_idx} OR p.customer ILIKE ${bind_idx} OR p.city ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        binds.push(BindValue::Text(format!("%{search}%")));
    }

    if let Some(ref city) = filter.city {
        conditions.push(format!("p.city = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(city.clone()));
    }

    if let Some(pm_user_id) = filter.pm_user_id {
        conditions.push(format!("p.pm_user_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(pm_user_id));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, binds, bind_idx)
}

fn bind_filter_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in binds {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

fn bind_filter_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in binds {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
