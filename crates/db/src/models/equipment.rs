//! Equipment and equipment-assignment models and DTOs.

use cometa_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const VALID_EQUIPMENT_STATUSES: &[&str] = &["available", "in_use", "maintenance", "broken"];

/// A row from the `equipment` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Equipment {
    pub id: DbId,
    pub name: String,
    pub equipment_type: String,
    pub inventory_no: Option<String>,
    pub owned: bool,
    pub status: String,
    pub rental_cost_per_day: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `equipment_assignments` table, joined with the equipment
/// and project names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentAssignment {
    pub id: DbId,
    pub equipment_id: DbId,
    pub project_id: DbId,
    pub crew_id: Option<DbId>,
    pub from_date: Date,
    pub to_date: Option<Date>,
    pub is_active: bool,
    pub equipment_name: Option<String>,
    pub project_name: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating equipment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipment {
    pub name: String,
    pub equipment_type: String,
    pub inventory_no: Option<String>,
    pub owned: Option<bool>,
    pub status: Option<String>,
    pub rental_cost_per_day: Option<f64>,
}

/// DTO for updating equipment.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEquipment {
    pub name: Option<String>,
    pub equipment_type: Option<String>,
    pub inventory_no: Option<String>,
    pub owned: Option<bool>,
    pub status: Option<String>,
    pub rental_cost_per_day: Option<f64>,
}

/// Filter parameters for listing equipment.
#[derive(Debug, Clone, Default)]
pub struct EquipmentFilter {
    pub status: Option<String>,
    pub equipment_type: Option<String>,
    /// Case-insensitive match against name or inventory number.
    pub search: Option<String>,
}

/// DTO for assigning equipment to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipmentAssignment {
    pub equipment_id: DbId,
    pub project_id: DbId,
    pub crew_id: Option<DbId>,
    pub from_date: Date,
    pub to_date: Option<Date>,
}
