//! Crew and crew-member models and DTOs.

use cometa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `crews` table, joined with the foreman's name and the
/// member count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Crew {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub name: String,
    pub foreman_user_id: Option<DbId>,
    pub foreman_name: Option<String>,
    pub member_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `crew_members` table, joined with the member's name and role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CrewMember {
    pub id: DbId,
    pub crew_id: DbId,
    pub user_id: DbId,
    pub user_name: Option<String>,
    pub user_role: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a crew.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCrew {
    pub name: String,
    pub project_id: Option<DbId>,
    pub foreman_user_id: Option<DbId>,
}

/// DTO for updating a crew. `project_id` and `foreman_user_id` use a double
/// Option: an absent field leaves the value unchanged, an explicit `null`
/// clears it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCrew {
    pub name: Option<String>,
    #[serde(default)]
    pub project_id: Option<Option<DbId>>,
    #[serde(default)]
    pub foreman_user_id: Option<Option<DbId>>,
}

/// DTO for adding a member to a crew.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCrewMember {
    pub user_id: DbId,
}
