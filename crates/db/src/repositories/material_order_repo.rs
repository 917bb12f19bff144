//! Repository for the `material_orders` and `material_order_items` tables.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::material::MOVE_RECEIVE;
use crate::models::material_order::{
    CreateOrder, MaterialOrder, MaterialOrderItem, OrderFilter, UpdateOrder,
};

/// Orders are always read joined with the supplier name and the item total.
const COLUMNS: &str = "o.id, o.supplier_id, o.order_number, o.status, o.order_date, \
                        o.expected_delivery_date, o.actual_delivery_date, o.notes, \
                        o.created_by, s.name AS supplier_name, \
                        COALESCE((SELECT SUM(i.quantity * i.unit_cost) \
                                   FROM material_order_items i WHERE i.order_id = o.id), 0) \
                            AS total_cost, \
                        o.created_at, o.updated_at";

const FROM: &str = "FROM material_orders o JOIN suppliers s ON o.supplier_id = s.id";

const ITEM_COLUMNS: &str = "i.id, i.order_id, i.material_id, i.quantity, i.unit_cost, \
                             m.name AS material_name";

/// Provides CRUD and delivery operations for material orders.
pub struct MaterialOrderRepo;

impl MaterialOrderRepo {
    /// Insert an order with its items in one transaction, returning the
    /// created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateOrder,
    ) -> Result<MaterialOrder, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO material_orders (supplier_id, order_number, expected_delivery_date,
                                          notes, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.supplier_id)
        .bind(&input.order_number)
        .bind(input.expected_delivery_date)
        .bind(&input.notes)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            sqlx::query(
                "INSERT INTO material_order_items (order_id, material_id, quantity, unit_cost)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(item.material_id)
            .bind(item.quantity)
            .bind(item.unit_cost)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let query = format!("SELECT {COLUMNS} {FROM} WHERE o.id = $1");
        sqlx::query_as::<_, MaterialOrder>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find an order by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MaterialOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE o.id = $1");
        sqlx::query_as::<_, MaterialOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List orders matching the filter, newest order date first.
    pub async fn list(
        pool: &PgPool,
        filter: &OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MaterialOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM} \
             WHERE ($1::BIGINT IS NULL OR o.supplier_id = $1) \
               AND ($2::TEXT IS NULL OR o.status = $2) \
             ORDER BY o.order_date DESC, o.id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, MaterialOrder>(&query)
            .bind(filter.supplier_id)
            .bind(&filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count orders matching the filter.
    pub async fn count(pool: &PgPool, filter: &OrderFilter) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM material_orders o \
             WHERE ($1::BIGINT IS NULL OR o.supplier_id = $1) \
               AND ($2::TEXT IS NULL OR o.status = $2)",
        )
        .bind(filter.supplier_id)
        .bind(&filter.status)
        .fetch_one(pool)
        .await
    }

    /// List the items of an order.
    pub async fn list_items(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<MaterialOrderItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM material_order_items i \
             JOIN materials m ON i.material_id = m.id \
             WHERE i.order_id = $1 ORDER BY i.id"
        );
        sqlx::query_as::<_, MaterialOrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Update order metadata and status.
    ///
    /// Terminal orders (`delivered`, `cancelled`) are not updatable; the
    /// status guard returns `None` for them as well as for missing rows.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<MaterialOrder>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE material_orders SET
                status = COALESCE($2, status),
                expected_delivery_date = COALESCE($3, expected_delivery_date),
                notes = COALESCE($4, notes),
                updated_at = NOW()
             WHERE id = $1 AND status NOT IN ('delivered', 'cancelled')
             RETURNING id",
        )
        .bind(id)
        .bind(&input.status)
        .bind(input.expected_delivery_date)
        .bind(&input.notes)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Mark an order delivered and receive its items into stock, in one
    /// transaction: each item's quantity is added to `current_stock_qty`
    /// and a `receive` move is recorded.
    ///
    /// Returns `None` when the order is missing or already terminal.
    pub async fn deliver(pool: &PgPool, id: DbId) -> Result<Option<MaterialOrder>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let delivered: Option<(DbId, String)> = sqlx::query_as(
            "UPDATE material_orders
             SET status = 'delivered', actual_delivery_date = CURRENT_DATE, updated_at = NOW()
             WHERE id = $1 AND status NOT IN ('delivered', 'cancelled')
             RETURNING id, order_number",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((_, order_number)) = delivered else {
            tx.rollback().await?;
            return Ok(None);
        };

        let items: Vec<(DbId, f64)> = sqlx::query_as(
            "SELECT material_id, quantity FROM material_order_items WHERE order_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for (material_id, quantity) in items {
            sqlx::query(
                "UPDATE materials SET current_stock_qty = current_stock_qty + $2,
                                      updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(material_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO material_moves (material_id, quantity, move_type, reason)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(material_id)
            .bind(quantity)
            .bind(MOVE_RECEIVE)
            .bind(format!("order {order_number}"))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }
}
