//! Work entry model and DTOs.

use cometa_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `work_entries` table, joined with the author's and
/// approver's names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkEntry {
    pub id: DbId,
    pub project_id: DbId,
    pub cabinet_id: Option<DbId>,
    pub segment_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub user_id: DbId,
    pub work_date: Date,
    pub stage_code: String,
    pub meters_done_m: f64,
    pub method: Option<String>,
    pub width_m: Option<f64>,
    pub depth_m: Option<f64>,
    pub cables_count: Option<i32>,
    pub has_protection_pipe: Option<bool>,
    pub soil_type: Option<String>,
    pub notes: Option<String>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    /// `first_name || ' ' || last_name` of the author, from a JOIN.
    pub user_name: Option<String>,
    /// Name of the approver, when approved.
    pub approver_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WorkEntry {
    pub fn is_approved(&self) -> bool {
        self.approved_by.is_some()
    }
}

/// DTO for creating a work entry. The author comes from the access token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkEntry {
    pub project_id: DbId,
    pub cabinet_id: Option<DbId>,
    pub segment_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub work_date: Date,
    pub stage_code: String,
    pub meters_done_m: f64,
    pub method: Option<String>,
    pub width_m: Option<f64>,
    pub depth_m: Option<f64>,
    pub cables_count: Option<i32>,
    pub has_protection_pipe: Option<bool>,
    pub soil_type: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an unapproved work entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkEntry {
    pub cabinet_id: Option<DbId>,
    pub segment_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub work_date: Option<Date>,
    pub stage_code: Option<String>,
    pub meters_done_m: Option<f64>,
    pub method: Option<String>,
    pub width_m: Option<f64>,
    pub depth_m: Option<f64>,
    pub cables_count: Option<i32>,
    pub has_protection_pipe: Option<bool>,
    pub soil_type: Option<String>,
    pub notes: Option<String>,
}

/// Filter parameters for listing work entries.
#[derive(Debug, Clone, Default)]
pub struct WorkEntryFilter {
    pub project_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub stage_code: Option<String>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    /// `Some(true)` = approved only, `Some(false)` = pending only.
    pub approved: Option<bool>,
}
