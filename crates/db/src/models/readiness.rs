//! Readiness checklist model and DTOs.

use cometa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `readiness_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadinessItem {
    pub id: DbId,
    pub project_id: DbId,
    pub category: String,
    pub title: String,
    pub required: bool,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for adding a checklist item (project id comes from the route).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReadinessItem {
    pub category: String,
    pub title: String,
    pub required: Option<bool>,
    pub note: Option<String>,
}

/// DTO for updating a checklist item. Toggling `completed` stamps or clears
/// `completed_at` in the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReadinessItem {
    pub category: Option<String>,
    pub title: Option<String>,
    pub required: Option<bool>,
    pub completed: Option<bool>,
    pub note: Option<String>,
}
