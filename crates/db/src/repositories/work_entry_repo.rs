//! Repository for the `work_entries` table.

use cometa_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::work_entry::{CreateWorkEntry, UpdateWorkEntry, WorkEntry, WorkEntryFilter};

/// Column list shared across queries. Entries are always read joined with
/// the author's and approver's names.
const COLUMNS: &str = "we.id, we.project_id, we.cabinet_id, we.segment_id, we.crew_id, \
                        we.user_id, we.work_date, we.stage_code, we.meters_done_m, we.method, \
                        we.width_m, we.depth_m, we.cables_count, we.has_protection_pipe, \
                        we.soil_type, we.notes, we.approved_by, we.approved_at, \
                        u.first_name || ' ' || u.last_name AS user_name, \
                        CASE WHEN app.id IS NULL THEN NULL \
                             ELSE app.first_name || ' ' || app.last_name END AS approver_name, \
                        we.created_at, we.updated_at";

const FROM: &str = "FROM work_entries we \
                     JOIN users u ON we.user_id = u.id \
                     LEFT JOIN users app ON we.approved_by = app.id";

/// Provides CRUD and approval operations for work entries.
pub struct WorkEntryRepo;

impl WorkEntryRepo {
    /// Insert a new work entry authored by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateWorkEntry,
    ) -> Result<WorkEntry, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO work_entries (project_id, cabinet_id, segment_id, crew_id, user_id,
                                       work_date, stage_code, meters_done_m, method, width_m,
                                       depth_m, cables_count, has_protection_pipe, soil_type, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING id",
        )
        .bind(input.project_id)
        .bind(input.cabinet_id)
        .bind(input.segment_id)
        .bind(input.crew_id)
        .bind(user_id)
        .bind(input.work_date)
        .bind(&input.stage_code)
        .bind(input.meters_done_m)
        .bind(&input.method)
        .bind(input.width_m)
        .bind(input.depth_m)
        .bind(input.cables_count)
        .bind(input.has_protection_pipe)
        .bind(&input.soil_type)
        .bind(&input.notes)
        .fetch_one(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} {FROM} WHERE we.id = $1");
        sqlx::query_as::<_, WorkEntry>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a work entry by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE we.id = $1");
        sqlx::query_as::<_, WorkEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List work entries matching the filter, newest work date first.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkEntryFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkEntry>, sqlx::Error> {
        let (where_clause, binds, next_idx) = build_entry_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} {FROM} {where_clause} \
             ORDER BY we.work_date DESC, we.id DESC \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        let q = bind_filter_values(sqlx::query_as::<_, WorkEntry>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count work entries matching the filter.
    pub async fn count(pool: &PgPool, filter: &WorkEntryFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_entry_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT {FROM} {where_clause}");
        let q = bind_filter_values_scalar(sqlx::query_scalar::<_, i64>(&query), &binds);
        q.fetch_one(pool).await
    }

    /// Update an entry. Only non-`None` fields in `input` are applied.
    ///
    /// The caller must reject updates to approved entries before calling;
    /// the `approved_by IS NULL` guard here is the backstop.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkEntry,
    ) -> Result<Option<WorkEntry>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE work_entries SET
                cabinet_id = COALESCE($2, cabinet_id),
                segment_id = COALESCE($3, segment_id),
                crew_id = COALESCE($4, crew_id),
                work_date = COALESCE($5, work_date),
                stage_code = COALESCE($6, stage_code),
                meters_done_m = COALESCE($7, meters_done_m),
                method = COALESCE($8, method),
                width_m = COALESCE($9, width_m),
                depth_m = COALESCE($10, depth_m),
                cables_count = COALESCE($11, cables_count),
                has_protection_pipe = COALESCE($12, has_protection_pipe),
                soil_type = COALESCE($13, soil_type),
                notes = COALESCE($14, notes),
                updated_at = NOW()
             WHERE id = $1 AND approved_by IS NULL
             RETURNING id",
        )
        .bind(id)
        .bind(input.cabinet_id)
        .bind(input.segment_id)
        .bind(input.crew_id)
        .bind(input.work_date)
        .bind(&input.stage_code)
        .bind(input.meters_done_m)
        .bind(&input.method)
        .bind(input.width_m)
        .bind(input.depth_m)
        .bind(input.cables_count)
        .bind(input.has_protection_pipe)
        .bind(&input.soil_type)
        .bind(&input.notes)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Approve an entry. Returns the updated row, or `None` if the entry is
    /// missing or already approved (the `approved_by IS NULL` guard makes the
    /// operation race-safe).
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        approver_id: DbId,
    ) -> Result<Option<WorkEntry>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE work_entries SET approved_by = $2, approved_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND approved_by IS NULL
             RETURNING id",
        )
        .bind(id)
        .bind(approver_id)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete an unapproved entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_entries WHERE id = $1 AND approved_by IS NULL")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Typed bind value for dynamically-built work entry queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Date(Date),
}

fn build_entry_filter(filter: &WorkEntryFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(project_id) = filter.project_id {
        conditions.push(format!("we.project_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(project_id));
    }

    if let Some(user_id) = filter.user_id {
        conditions.push(format!("we.user_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(user_id));
    }

    if let Some(crew_id) = filter.crew_id {
        conditions.push(format!("we.crew_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(crew_id));
    }

    if let Some(ref stage_code) = filter.stage_code {
        conditions.push(format!("we.stage_code = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(stage_code.clone()));
    }

    if let Some(date_from) = filter.date_from {
        conditions.push(format!("we.work_date >= ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Date(date_from));
    }

    if let Some(date_to) = filter.date_to {
        conditions.push(format!("we.work_date <= ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Date(date_to));
    }

    match filter.approved {
        Some(true) => conditions.push("we.approved_by IS NOT NULL".to_string()),
        Some(false) => conditions.push("we.approved_by IS NULL".to_string()),
        None => {}
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
            BindValue::Date(v) => q = q.bind(*v),
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
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
