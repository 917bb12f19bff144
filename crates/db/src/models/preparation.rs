//! Project preparation models: utility contacts, site facilities, crew
//! housing, and uploaded plan documents.

use cometa_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const VALID_FACILITY_STATUSES: &[&str] = &["planned", "rented", "returned"];
pub const VALID_HOUSING_STATUSES: &[&str] = &["available", "occupied", "maintenance"];

/// A row from the `utility_contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UtilityContact {
    pub id: DbId,
    pub project_id: DbId,
    pub kind: String,
    pub organization: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a utility contact (project id comes from the route).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUtilityContact {
    pub kind: String,
    pub organization: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a utility contact.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUtilityContact {
    pub kind: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// A row from the `facilities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Facility {
    pub id: DbId,
    pub project_id: DbId,
    pub facility_type: String,
    pub description: Option<String>,
    pub rent_from: Option<Date>,
    pub rent_to: Option<Date>,
    pub daily_rate: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a facility.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacility {
    pub facility_type: String,
    pub description: Option<String>,
    pub rent_from: Option<Date>,
    pub rent_to: Option<Date>,
    pub daily_rate: Option<f64>,
    pub status: Option<String>,
}

/// DTO for updating a facility.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFacility {
    pub facility_type: Option<String>,
    pub description: Option<String>,
    pub rent_from: Option<Date>,
    pub rent_to: Option<Date>,
    pub daily_rate: Option<f64>,
    pub status: Option<String>,
}

/// A row from the `housing_units` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HousingUnit {
    pub id: DbId,
    pub project_id: DbId,
    pub address: String,
    pub rooms: i32,
    pub beds: i32,
    pub occupied_beds: i32,
    pub monthly_rent: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a housing unit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHousingUnit {
    pub address: String,
    pub rooms: Option<i32>,
    pub beds: Option<i32>,
    pub monthly_rent: Option<f64>,
    pub status: Option<String>,
}

/// DTO for updating a housing unit.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHousingUnit {
    pub address: Option<String>,
    pub rooms: Option<i32>,
    pub beds: Option<i32>,
    pub occupied_beds: Option<i32>,
    pub monthly_rent: Option<f64>,
    pub status: Option<String>,
}

/// A row from the `project_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectPlan {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub filename: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Insert payload for a plan document; built by the upload handler.
#[derive(Debug, Clone)]
pub struct NewProjectPlan {
    pub project_id: DbId,
    pub title: String,
    pub filename: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<DbId>,
}

/// Aggregated preparation snapshot for a project.
#[derive(Debug, Clone, Serialize)]
pub struct PreparationSummary {
    pub project_id: DbId,
    pub potential_revenue: f64,
    pub utility_contact_count: i64,
    pub facility_count: i64,
    pub housing_unit_count: i64,
    pub plan_count: i64,
    pub readiness_percent: f64,
}
