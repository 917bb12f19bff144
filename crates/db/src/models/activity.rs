//! Activity log model and query types.

use cometa_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `activity_logs` table, joined with the actor's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub activity_type: String,
    pub description: String,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub user_name: Option<String>,
    pub created_at: Timestamp,
}

/// Insert payload for an activity log row (written by the event
/// persistence service).
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub activity_type: String,
    pub description: String,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub payload: serde_json::Value,
}

/// Filter parameters for querying the activity log.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub activity_type: Option<String>,
    pub date_from: Option<Timestamp>,
    pub date_to: Option<Timestamp>,
    /// Case-insensitive match against description or activity type.
    pub search: Option<String>,
}

/// One row of the per-type activity statistics.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityTypeCount {
    pub activity_type: String,
    pub count: i64,
}
