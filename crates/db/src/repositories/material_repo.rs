//! Repository for the `materials`, `material_moves`, and
//! `material_allocations` tables.
//!
//! Stock mutations (adjust, allocate, release) are transactional: the stock
//! columns, the allocation row, and the audit move row change together or
//! not at all.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::material::{
    AllocationFilter, CreateAllocation, CreateMaterial, Material, MaterialAllocation,
    MaterialFilter, MaterialMove, StockAdjustment, UpdateAllocation, UpdateMaterial, MOVE_ADJUST,
    MOVE_ALLOCATE, MOVE_RELEASE,
};

const COLUMNS: &str = "m.id, m.name, m.category, m.unit, m.unit_cost, m.current_stock_qty, \
                        m.reserved_qty, m.min_stock_level, m.supplier_id, \
                        s.name AS supplier_name, m.description, m.created_at, m.updated_at";

const FROM: &str = "FROM materials m LEFT JOIN suppliers s ON m.supplier_id = s.id";

const ALLOCATION_COLUMNS: &str = "ma.id, ma.material_id, ma.project_id, ma.crew_id, \
                                   ma.allocated_qty, ma.used_qty, ma.allocated_by, ma.notes, \
                                   m.name AS material_name, m.unit AS material_unit, \
                                   p.name AS project_name, ma.allocated_at";

const ALLOCATION_FROM: &str = "FROM material_allocations ma \
                                JOIN materials m ON ma.material_id = m.id \
                                LEFT JOIN projects p ON ma.project_id = p.id";

const MOVE_COLUMNS: &str = "id, material_id, quantity, move_type, reason, created_at";

/// Error type for stock-mutating operations.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    /// Requested more than `current_stock_qty - reserved_qty`.
    #[error("insufficient stock: requested {requested}, available {available}")]
    Insufficient { requested: f64, available: f64 },
}

/// Provides CRUD, stock, and allocation operations for materials.
pub struct MaterialRepo;

impl MaterialRepo {
    /// Insert a new material, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMaterial) -> Result<Material, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO materials (name, category, unit, unit_cost, current_stock_qty,
                                    min_stock_level, supplier_id, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.unit)
        .bind(input.unit_cost)
        .bind(input.current_stock_qty)
        .bind(input.min_stock_level)
        .bind(input.supplier_id)
        .bind(&input.description)
        .fetch_one(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} {FROM} WHERE m.id = $1");
        sqlx::query_as::<_, Material>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a material by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Material>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE m.id = $1");
        sqlx::query_as::<_, Material>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List materials matching the filter, by name.
    pub async fn list(
        pool: &PgPool,
        filter: &MaterialFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Material>, sqlx::Error> {
        let (where_clause, binds, next_idx) = build_material_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} {FROM} {where_clause} \
             ORDER BY m.name \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        let q = bind_filter_values(sqlx::query_as::<_, Material>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count materials matching the filter.
    pub async fn count(pool: &PgPool, filter: &MaterialFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_material_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT {FROM} {where_clause}");
        let q = bind_filter_values_scalar(sqlx::query_scalar::<_, i64>(&query), &binds);
        q.fetch_one(pool).await
    }

    /// List materials below their minimum stock level.
    pub async fn list_low_stock(pool: &PgPool) -> Result<Vec<Material>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM} \
             WHERE m.current_stock_qty < m.min_stock_level \
             ORDER BY m.current_stock_qty / NULLIF(m.min_stock_level, 0)"
        );
        sqlx::query_as::<_, Material>(&query).fetch_all(pool).await
    }

    /// Update a material. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMaterial,
    ) -> Result<Option<Material>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE materials SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                unit = COALESCE($4, unit),
                unit_cost = COALESCE($5, unit_cost),
                min_stock_level = COALESCE($6, min_stock_level),
                supplier_id = COALESCE($7, supplier_id),
                description = COALESCE($8, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.unit)
        .bind(input.unit_cost)
        .bind(input.min_stock_level)
        .bind(input.supplier_id)
        .bind(&input.description)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete a material. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a signed stock adjustment and record the move, in one
    /// transaction. The new stock is clamped at zero.
    ///
    /// Returns `None` when the material does not exist.
    pub async fn adjust_stock(
        pool: &PgPool,
        id: DbId,
        quantity: f64,
        reason: &str,
    ) -> Result<Option<StockAdjustment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old_qty: Option<f64> =
            sqlx::query_scalar("SELECT current_stock_qty FROM materials WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(old_qty) = old_qty else {
            tx.rollback().await?;
            return Ok(None);
        };

        let new_qty = (old_qty + quantity).max(0.0);

        sqlx::query(
            "UPDATE materials SET current_stock_qty = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(new_qty)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO material_moves (material_id, quantity, move_type, reason)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(quantity)
        .bind(MOVE_ADJUST)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(StockAdjustment {
            material_id: id,
            old_quantity: old_qty,
            new_quantity: new_qty,
            adjustment: quantity,
        }))
    }

    /// Allocate stock to a project or crew: insert the allocation row, bump
    /// `reserved_qty`, and record the move, in one transaction.
    ///
    /// Fails with [`StockError::Insufficient`] when the requested quantity
    /// exceeds `current_stock_qty - reserved_qty`; the row lock makes the
    /// check race-safe. A missing material surfaces as `RowNotFound`.
    pub async fn allocate(
        pool: &PgPool,
        allocated_by: DbId,
        input: &CreateAllocation,
    ) -> Result<MaterialAllocation, StockError> {
        let mut tx = pool.begin().await?;

        let row: (f64, f64) = sqlx::query_as(
            "SELECT current_stock_qty, reserved_qty FROM materials WHERE id = $1 FOR UPDATE",
        )
        .bind(input.material_id)
        .fetch_one(&mut *tx)
        .await?;

        let available = (row.0 - row.1).max(0.0);
        if input.allocated_qty > available {
            tx.rollback().await?;
            return Err(StockError::Insufficient {
                requested: input.allocated_qty,
                available,
            });
        }

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO material_allocations (material_id, project_id, crew_id, allocated_qty,
                                               allocated_by, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.material_id)
        .bind(input.project_id)
        .bind(input.crew_id)
        .bind(input.allocated_qty)
        .bind(allocated_by)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE materials SET reserved_qty = reserved_qty + $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(input.material_id)
        .bind(input.allocated_qty)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO material_moves (material_id, quantity, move_type, reason)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(input.material_id)
        .bind(input.allocated_qty)
        .bind(MOVE_ALLOCATE)
        .bind(&input.notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let allocation = Self::find_allocation(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(allocation)
    }

    /// Find a single allocation by ID.
    pub async fn find_allocation(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaterialAllocation>, sqlx::Error> {
        let query = format!("SELECT {ALLOCATION_COLUMNS} {ALLOCATION_FROM} WHERE ma.id = $1");
        sqlx::query_as::<_, MaterialAllocation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List allocations matching the filter, newest first.
    pub async fn list_allocations(
        pool: &PgPool,
        filter: &AllocationFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MaterialAllocation>, sqlx::Error> {
        let query = format!(
            "SELECT {ALLOCATION_COLUMNS} {ALLOCATION_FROM} \
             WHERE ($1::BIGINT IS NULL OR ma.project_id = $1) \
               AND ($2::BIGINT IS NULL OR ma.crew_id = $2) \
               AND ($3::BIGINT IS NULL OR ma.material_id = $3) \
             ORDER BY ma.allocated_at DESC, ma.id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, MaterialAllocation>(&query)
            .bind(filter.project_id)
            .bind(filter.crew_id)
            .bind(filter.material_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count allocations matching the filter.
    pub async fn count_allocations(
        pool: &PgPool,
        filter: &AllocationFilter,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM material_allocations ma \
             WHERE ($1::BIGINT IS NULL OR ma.project_id = $1) \
               AND ($2::BIGINT IS NULL OR ma.crew_id = $2) \
               AND ($3::BIGINT IS NULL OR ma.material_id = $3)",
        )
        .bind(filter.project_id)
        .bind(filter.crew_id)
        .bind(filter.material_id)
        .fetch_one(pool)
        .await
    }

    /// Record consumption against an allocation.
    ///
    /// Returns `None` if the allocation does not exist. The caller validates
    /// `used_qty <= allocated_qty` beforehand; the SQL guard is the backstop.
    pub async fn update_allocation(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAllocation,
    ) -> Result<Option<MaterialAllocation>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE material_allocations SET used_qty = $2
             WHERE id = $1 AND $2 <= allocated_qty
             RETURNING id",
        )
        .bind(id)
        .bind(input.used_qty)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_allocation(pool, id).await,
            None => Ok(None),
        }
    }

    /// Remove an allocation and release its reservation, in one transaction.
    ///
    /// Returns `true` if the allocation existed.
    pub async fn release_allocation(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId, f64)> = sqlx::query_as(
            "DELETE FROM material_allocations WHERE id = $1 RETURNING material_id, allocated_qty",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((material_id, qty)) = row else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE materials
             SET reserved_qty = GREATEST(reserved_qty - $2, 0), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(material_id)
        .bind(qty)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO material_moves (material_id, quantity, move_type, reason)
             VALUES ($1, $2, $3, NULL)",
        )
        .bind(material_id)
        .bind(-qty)
        .bind(MOVE_RELEASE)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// List the movement history for a material, newest first.
    pub async fn list_moves(
        pool: &PgPool,
        material_id: DbId,
        limit: i64,
    ) -> Result<Vec<MaterialMove>, sqlx::Error> {
        let query = format!(
            "SELECT {MOVE_COLUMNS} FROM material_moves \
             WHERE material_id = $1 ORDER BY id DESC LIMIT $2"
        );
        sqlx::query_as::<_, MaterialMove>(&query)
            .bind(material_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

/// Typed bind value for dynamically-built material queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
}

fn build_material_filter(filter: &MaterialFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(ref category) = filter.category {
        conditions.push(format!("m.category = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(category.clone()));
    }

    if let Some(supplier_id) = filter.supplier_id {
        conditions.push(format!("m.supplier_id = ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(supplier_id));
    }

    if let Some(ref search) = filter.search {
        conditions.push(format!(
            "(m.name ILIKE ${bind_idx} OR m.category ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        binds.push(BindValue::Text(format!("%{search}%")));
    }

    if filter.low_stock {
        conditions.push("m.current_stock_qty < m.min_stock_level".to_string());
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
