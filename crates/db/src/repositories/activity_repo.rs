//! Repository for the `activity_logs` table.

use cometa_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::activity::{ActivityFilter, ActivityLog, ActivityTypeCount, NewActivityLog};

const COLUMNS: &str = "al.id, al.user_id, al.project_id, al.activity_type, al.description, \
                        al.target_type, al.target_id, al.payload, \
                        CASE WHEN u.id IS NULL THEN NULL \
                             ELSE u.first_name || ' ' || u.last_name END AS user_name, \
                        al.created_at";

const FROM: &str = "FROM activity_logs al LEFT JOIN users u ON al.user_id = u.id";

/// Provides insert and query operations for the activity audit log.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert an activity row, returning the generated ID.
    pub async fn insert(pool: &PgPool, input: &NewActivityLog) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO activity_logs (user_id, project_id, activity_type, description,
                                        target_type, target_id, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(input.project_id)
        .bind(&input.activity_type)
        .bind(&input.description)
        .bind(&input.target_type)
        .bind(input.target_id)
        .bind(&input.payload)
        .fetch_one(pool)
        .await
    }

    /// Query activity rows matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ActivityFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let (where_clause, binds, next_idx) = build_activity_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} {FROM} {where_clause} \
             ORDER BY al.created_at DESC, al.id DESC \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        let q = bind_filter_values(sqlx::query_as::<_, ActivityLog>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count activity rows matching the filter.
    pub async fn count(pool: &PgPool, filter: &ActivityFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_activity_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT {FROM} {where_clause}");
        let q = bind_filter_values_scalar(sqlx::query_scalar::<_, i64>(&query), &binds);
        q.fetch_one(pool).await
    }

    /// Count activity rows grouped by type over an optional date range.
    pub async fn stats(
        pool: &PgPool,
        date_from: Option<Timestamp>,
        date_to: Option<Timestamp>,
    ) -> Result<Vec<ActivityTypeCount>, sqlx::Error> {
        sqlx::query_as::<_, ActivityTypeCount>(
            "SELECT activity_type, COUNT(*)::BIGINT AS count
             FROM activity_logs
             WHERE ($1::TIMESTAMPTZ IS NULL OR created_at >= $1)
               AND ($2::TIMESTAMPTZ IS NULL OR created_at <= $2)
             GROUP BY activity_type
             ORDER BY count DESC",
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_all(pool)
        .await
    }
}

/// Typed bind value for dynamically-built activity queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
}

fn build_activity_filter(filter: &ActivityFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(user_id) = filter.user_id {
        conditions.push(format!("al.user_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(user_id));
    }

    if let Some(project_id) = filter.project_id {
        conditions.push(format!("al.project_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(project_id));
    }

    if let Some(ref activity_type) = filter.activity_type {
        conditions.push(format!("al.activity_type = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(activity_type.clone()));
    }

    if let Some(date_from) = filter.date_from {
        conditions.push(format!("al.created_at >= ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Timestamp(date_from));
    }

    if let Some(date_to) = filter.date_to {
        conditions.push(format!("al.created_at <= ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Timestamp(date_to));
    }

    if let Some(ref search) = filter.search {
        conditions.push(format!(
            "(al.description ILIKE ${bind_idx} OR al.activity_type ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        binds.push(BindValue::Text(format!("%{search}%")));
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
            BindValue::Timestamp(v) => q = q.bind(*v),
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
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
