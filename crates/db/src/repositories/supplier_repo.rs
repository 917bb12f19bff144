//! Repository for the `suppliers` table.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};

const COLUMNS: &str = "id, name, contact_person, email, phone, address, payment_terms, \
                        created_at, updated_at";

/// Provides CRUD operations for suppliers.
pub struct SupplierRepo;

impl SupplierRepo {
    /// Insert a new supplier, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSupplier) -> Result<Supplier, sqlx::Error> {
        let query = format!(
            "INSERT INTO suppliers (name, contact_person, email, phone, address, payment_terms)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(&input.name)
            .bind(&input.contact_person)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.payment_terms)
            .fetch_one(pool)
            .await
    }

    /// Find a supplier by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Supplier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM suppliers WHERE id = $1");
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List suppliers, optionally filtered by a name search, by name.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Supplier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM suppliers \
             WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%') \
             ORDER BY name \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count suppliers matching the name search.
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM suppliers \
             WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(pool)
        .await
    }

    /// Update a supplier. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSupplier,
    ) -> Result<Option<Supplier>, sqlx::Error> {
        let query = format!(
            "UPDATE suppliers SET
                name = COALESCE($2, name),
                contact_person = COALESCE($3, contact_person),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                payment_terms = COALESCE($7, payment_terms),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_person)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.payment_terms)
            .fetch_optional(pool)
            .await
    }

    /// Delete a supplier. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count materials and orders referencing a supplier (dependency check
    /// for delete).
    pub async fn dependent_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT (SELECT COUNT(*) FROM materials WHERE supplier_id = $1)
                  + (SELECT COUNT(*) FROM material_orders WHERE supplier_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
