//! Cabinet (network distribution point) model and DTOs.

use cometa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cabinets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cabinet {
    pub id: DbId,
    pub project_id: DbId,
    pub code: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub gps_lat: Option<f64>,
    pub gps_lon: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for creating a cabinet (project id comes from the route).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCabinet {
    pub code: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub gps_lat: Option<f64>,
    pub gps_lon: Option<f64>,
}

/// DTO for updating a cabinet.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCabinet {
    pub code: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub gps_lat: Option<f64>,
    pub gps_lon: Option<f64>,
}
