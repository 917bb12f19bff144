//! Work-entry photo model.

use cometa_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub work_entry_id: DbId,
    pub file_path: String,
    pub taken_at: Timestamp,
    pub gps_lat: Option<f64>,
    pub gps_lon: Option<f64>,
    pub label: Option<String>,
    pub author_user_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Insert payload for a photo; built by the upload handler after the file
/// has been written to disk.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub work_entry_id: DbId,
    pub file_path: String,
    pub gps_lat: Option<f64>,
    pub gps_lon: Option<f64>,
    pub label: Option<String>,
    pub author_user_id: Option<DbId>,
}
