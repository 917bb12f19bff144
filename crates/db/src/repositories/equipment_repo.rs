//! Repository for the `equipment` and `equipment_assignments` tables.

use cometa_core::types::DbId;
use sqlx::PgPool;

use crate::models::equipment::{
    CreateEquipment, CreateEquipmentAssignment, Equipment, EquipmentAssignment, EquipmentFilter,
    UpdateEquipment,
};

const COLUMNS: &str = "id, name, equipment_type, inventory_no, owned, status, \
                        rental_cost_per_day, created_at, updated_at";

const ASSIGNMENT_COLUMNS: &str = "ea.id, ea.equipment_id, ea.project_id, ea.crew_id, \
                                   ea.from_date, ea.to_date, ea.is_active, \
                                   e.name AS equipment_name, p.name AS project_name, \
                                   ea.created_at";

const ASSIGNMENT_FROM: &str = "FROM equipment_assignments ea \
                                JOIN equipment e ON ea.equipment_id = e.id \
                                JOIN projects p ON ea.project_id = p.id";

/// Provides CRUD and assignment operations for equipment.
pub struct EquipmentRepo;

impl EquipmentRepo {
    /// Insert new equipment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEquipment) -> Result<Equipment, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment (name, equipment_type, inventory_no, owned, status,
                                    rental_cost_per_day)
             VALUES ($1, $2, $3, COALESCE($4, true), COALESCE($5, 'available'), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(&input.name)
            .bind(&input.equipment_type)
            .bind(&input.inventory_no)
            .bind(input.owned)
            .bind(&input.status)
            .bind(input.rental_cost_per_day)
            .fetch_one(pool)
            .await
    }

    /// Find equipment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE id = $1");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List equipment matching the filter, by name.
    pub async fn list(
        pool: &PgPool,
        filter: &EquipmentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Equipment>, sqlx::Error> {
        let (where_clause, binds, next_idx) = build_equipment_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM equipment {where_clause} \
             ORDER BY name \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );
        let mut q = sqlx::query_as::<_, Equipment>(&query);
        for bind in &binds {
            q = q.bind(bind.as_str());
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count equipment matching the filter.
    pub async fn count(pool: &PgPool, filter: &EquipmentFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_equipment_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM equipment {where_clause}");
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for bind in &binds {
            q = q.bind(bind.as_str());
        }
        q.fetch_one(pool).await
    }

    /// List equipment that is `available` and has no active assignment.
    pub async fn list_available(pool: &PgPool) -> Result<Vec<Equipment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM equipment e \
             WHERE e.status = 'available' \
               AND NOT EXISTS (SELECT 1 FROM equipment_assignments ea \
                                WHERE ea.equipment_id = e.id AND ea.is_active) \
             ORDER BY e.name"
        );
        sqlx::query_as::<_, Equipment>(&query).fetch_all(pool).await
    }

    /// Update equipment. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEquipment,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment SET
                name = COALESCE($2, name),
                equipment_type = COALESCE($3, equipment_type),
                inventory_no = COALESCE($4, inventory_no),
                owned = COALESCE($5, owned),
                status = COALESCE($6, status),
                rental_cost_per_day = COALESCE($7, rental_cost_per_day),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.equipment_type)
            .bind(&input.inventory_no)
            .bind(input.owned)
            .bind(&input.status)
            .bind(input.rental_cost_per_day)
            .fetch_optional(pool)
            .await
    }

    /// Delete equipment (assignments cascade). Returns `true` if removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign equipment to a project and mark it `in_use`, in one transaction.
    ///
    /// Returns `None` when the equipment is not currently `available` (the
    /// status guard makes the check race-safe).
    pub async fn assign(
        pool: &PgPool,
        input: &CreateEquipmentAssignment,
    ) -> Result<Option<EquipmentAssignment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let marked: Option<DbId> = sqlx::query_scalar(
            "UPDATE equipment SET status = 'in_use', updated_at = NOW()
             WHERE id = $1 AND status = 'available'
             RETURNING id",
        )
        .bind(input.equipment_id)
        .fetch_optional(&mut *tx)
        .await?;

        if marked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO equipment_assignments (equipment_id, project_id, crew_id, from_date, to_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.equipment_id)
        .bind(input.project_id)
        .bind(input.crew_id)
        .bind(input.from_date)
        .bind(input.to_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let query = format!("SELECT {ASSIGNMENT_COLUMNS} {ASSIGNMENT_FROM} WHERE ea.id = $1");
        sqlx::query_as::<_, EquipmentAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// End an assignment and return the equipment to `available`, in one
    /// transaction. Returns `true` if an active assignment was ended.
    pub async fn end_assignment(pool: &PgPool, assignment_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let equipment_id: Option<DbId> = sqlx::query_scalar(
            "UPDATE equipment_assignments
             SET is_active = false, to_date = COALESCE(to_date, CURRENT_DATE)
             WHERE id = $1 AND is_active
             RETURNING equipment_id",
        )
        .bind(assignment_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(equipment_id) = equipment_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE equipment SET status = 'available', updated_at = NOW()
             WHERE id = $1 AND status = 'in_use'",
        )
        .bind(equipment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// List assignments, optionally restricted to one project.
    pub async fn list_assignments(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<EquipmentAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {ASSIGNMENT_COLUMNS} {ASSIGNMENT_FROM} \
             WHERE ($1::BIGINT IS NULL OR ea.project_id = $1) \
             ORDER BY ea.from_date DESC, ea.id DESC"
        );
        sqlx::query_as::<_, EquipmentAssignment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}

fn build_equipment_filter(filter: &EquipmentFilter) -> (String, Vec<String>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<String> = Vec::new();

    if let Some(ref status) = filter.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        binds.push(status.clone());
    }

    if let Some(ref equipment_type) = filter.equipment_type {
        conditions.push(format!("equipment_type = ${bind_idx}"));
        bind_idx += 1;
        binds.push(equipment_type.clone());
    }

    if let Some(ref search) = filter.search {
        conditions.push(format!(
            "(name ILIKE ${bind_idx} OR inventory_no ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        binds.push(format!("%{search}%"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, binds, bind_idx)
}
