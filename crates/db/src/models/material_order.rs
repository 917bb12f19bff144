//! Material order and order-item models and DTOs.

use cometa_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const VALID_ORDER_STATUSES: &[&str] =
    &["draft", "pending", "ordered", "delivered", "cancelled"];

/// Statuses from which no further transition is allowed.
pub const TERMINAL_ORDER_STATUSES: &[&str] = &["delivered", "cancelled"];

/// A row from the `material_orders` table, joined with the supplier name and
/// the total cost summed over items.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaterialOrder {
    pub id: DbId,
    pub supplier_id: DbId,
    pub order_number: String,
    pub status: String,
    pub order_date: Date,
    pub expected_delivery_date: Option<Date>,
    pub actual_delivery_date: Option<Date>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub supplier_name: Option<String>,
    pub total_cost: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `material_order_items` table, joined with the material name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaterialOrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub material_id: DbId,
    pub quantity: f64,
    pub unit_cost: f64,
    pub material_name: Option<String>,
}

/// DTO for one line of a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderItem {
    pub material_id: DbId,
    pub quantity: f64,
    pub unit_cost: f64,
}

/// DTO for creating an order with its items.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub supplier_id: DbId,
    pub order_number: String,
    pub expected_delivery_date: Option<Date>,
    pub notes: Option<String>,
    pub items: Vec<CreateOrderItem>,
}

/// DTO for updating an order (status transition, delivery dates, notes).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrder {
    pub status: Option<String>,
    pub expected_delivery_date: Option<Date>,
    pub notes: Option<String>,
}

/// Filter parameters for listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub supplier_id: Option<DbId>,
    pub status: Option<String>,
}
