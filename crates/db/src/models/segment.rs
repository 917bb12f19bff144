//! Segment (cable routing section) model and DTOs.

use cometa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const VALID_SURFACES: &[&str] = &["asphalt", "concrete", "pavers", "green"];
pub const VALID_AREAS: &[&str] = &["roadway", "sidewalk", "driveway", "green"];
pub const VALID_SEGMENT_STATUSES: &[&str] = &["open", "in_progress", "done"];

/// A row from the `segments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Segment {
    pub id: DbId,
    pub cabinet_id: DbId,
    pub name: Option<String>,
    pub length_planned_m: f64,
    pub surface: String,
    pub area: String,
    pub depth_req_m: Option<f64>,
    pub width_req_m: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a segment (cabinet id comes from the route).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSegment {
    pub name: Option<String>,
    pub length_planned_m: f64,
    pub surface: Option<String>,
    pub area: Option<String>,
    pub depth_req_m: Option<f64>,
    pub width_req_m: Option<f64>,
}

/// DTO for updating a segment.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSegment {
    pub name: Option<String>,
    pub length_planned_m: Option<f64>,
    pub surface: Option<String>,
    pub area: Option<String>,
    pub depth_req_m: Option<f64>,
    pub width_req_m: Option<f64>,
    pub status: Option<String>,
}
