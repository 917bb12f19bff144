//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use cometa_core::types::DbId;
use serde::Deserialize;

/// Query parameters for list endpoints that accept a `project_id` scope.
#[derive(Debug, Deserialize)]
pub struct ProjectScopeParams {
    pub project_id: Option<DbId>,
}
