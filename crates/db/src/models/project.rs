//! Project entity model and DTOs.

use cometa_core::progress::project_budget;
use cometa_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Valid project statuses.
pub const VALID_PROJECT_STATUSES: &[&str] = &["draft", "active", "waiting_invoice", "closed"];

/// A row from the `projects` table, joined with the PM's name when present.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub customer: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub contact_24h: Option<String>,
    pub start_date: Option<Date>,
    pub end_date_plan: Option<Date>,
    pub status: String,
    pub total_length_m: f64,
    pub base_rate_per_m: f64,
    pub pm_user_id: Option<DbId>,
    pub language_default: String,
    /// `first_name || ' ' || last_name` of the PM, from a LEFT JOIN.
    pub pm_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Derived budget: planned length times the base rate.
    pub fn budget(&self) -> f64 {
        project_budget(self.total_length_m, self.base_rate_per_m)
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub customer: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub contact_24h: Option<String>,
    pub start_date: Option<Date>,
    pub end_date_plan: Option<Date>,
    #[serde(default)]
    pub total_length_m: f64,
    #[serde(default)]
    pub base_rate_per_m: f64,
    pub pm_user_id: Option<DbId>,
    pub language_default: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub customer: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub contact_24h: Option<String>,
    pub start_date: Option<Date>,
    pub end_date_plan: Option<Date>,
    pub status: Option<String>,
    pub total_length_m: Option<f64>,
    pub base_rate_per_m: Option<f64>,
    pub pm_user_id: Option<DbId>,
    pub language_default: Option<String>,
}

/// Filter parameters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<String>,
    /// Case-insensitive match against name, customer, or city.
    pub search: Option<String>,
    pub city: Option<String>,
    pub pm_user_id: Option<DbId>,
}

/// Aggregate figures for the project summary endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub project_id: DbId,
    /// Meters across approved work entries only.
    pub meters_done_m: f64,
    /// Progress percent vs the planned length, clamped to [0, 100].
    pub progress_percent: f64,
    pub budget: f64,
    /// Approved meters times the base rate.
    pub spent: f64,
    pub crew_count: i64,
    pub open_segment_count: i64,
}
