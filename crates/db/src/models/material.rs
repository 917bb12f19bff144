//! Material, stock movement, and allocation models and DTOs.

use cometa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const VALID_UNITS: &[&str] = &[
    "piece", "meter", "kg", "ton", "liter", "m3", "box", "pallet", "roll",
];

/// Stock movement kinds recorded in `material_moves.move_type`.
pub const MOVE_ADJUST: &str = "adjust";
pub const MOVE_ALLOCATE: &str = "allocate";
pub const MOVE_RELEASE: &str = "release";
pub const MOVE_RECEIVE: &str = "receive";

/// A row from the `materials` table, joined with the supplier name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Material {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub unit_cost: f64,
    pub current_stock_qty: f64,
    pub reserved_qty: f64,
    pub min_stock_level: f64,
    pub supplier_id: Option<DbId>,
    pub supplier_name: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Material {
    /// Stock not yet promised to a project or crew.
    pub fn available_qty(&self) -> f64 {
        (self.current_stock_qty - self.reserved_qty).max(0.0)
    }
}

/// DTO for creating a material.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaterial {
    pub name: String,
    pub category: String,
    pub unit: String,
    #[serde(default)]
    pub unit_cost: f64,
    #[serde(default)]
    pub current_stock_qty: f64,
    #[serde(default)]
    pub min_stock_level: f64,
    pub supplier_id: Option<DbId>,
    pub description: Option<String>,
}

/// DTO for updating a material.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMaterial {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub unit_cost: Option<f64>,
    pub min_stock_level: Option<f64>,
    pub supplier_id: Option<DbId>,
    pub description: Option<String>,
}

/// Filter parameters for listing materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    pub category: Option<String>,
    pub supplier_id: Option<DbId>,
    /// Case-insensitive match against name or category.
    pub search: Option<String>,
    /// When true, only materials below their minimum stock level.
    pub low_stock: bool,
}

/// A row from the `material_moves` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaterialMove {
    pub id: DbId,
    pub material_id: DbId,
    pub quantity: f64,
    pub move_type: String,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the `material_allocations` table, joined with material and
/// project names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaterialAllocation {
    pub id: DbId,
    pub material_id: DbId,
    pub project_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub allocated_qty: f64,
    pub used_qty: f64,
    pub allocated_by: DbId,
    pub notes: Option<String>,
    pub material_name: Option<String>,
    pub material_unit: Option<String>,
    pub project_name: Option<String>,
    pub allocated_at: Timestamp,
}

/// DTO for allocating material to a project or crew. The allocating user
/// comes from the access token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAllocation {
    pub material_id: DbId,
    pub project_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub allocated_qty: f64,
    pub notes: Option<String>,
}

/// DTO for recording consumption against an allocation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAllocation {
    pub used_qty: f64,
}

/// Filter parameters for listing allocations.
#[derive(Debug, Clone, Default)]
pub struct AllocationFilter {
    pub project_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub material_id: Option<DbId>,
}

/// Result of a stock adjustment, echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct StockAdjustment {
    pub material_id: DbId,
    pub old_quantity: f64,
    pub new_quantity: f64,
    pub adjustment: f64,
}
