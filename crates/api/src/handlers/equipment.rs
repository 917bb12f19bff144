//! Handlers for the `/equipment` resource and assignments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::pagination::{Page, PageParams};
use cometa_core::types::DbId;
use cometa_db::models::equipment::{
    CreateEquipment, CreateEquipmentAssignment, Equipment, EquipmentAssignment, EquipmentFilter,
    UpdateEquipment, VALID_EQUIPMENT_STATUSES,
};
use cometa_db::repositories::EquipmentRepo;
use cometa_events::ActivityEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectScopeParams;
use crate::state::AppState;

/// Query parameters for `GET /equipment`.
#[derive(Debug, Deserialize)]
pub struct ListEquipmentParams {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/equipment
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListEquipmentParams>,
) -> AppResult<Json<Page<Equipment>>> {
    if let Some(ref status) = params.status {
        validate_status(status)?;
    }

    let filter = EquipmentFilter {
        status: params.status,
        equipment_type: params.equipment_type,
        search: params.search,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = EquipmentRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = EquipmentRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/equipment
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Equipment name is required".into(),
        )));
    }
    if let Some(ref status) = input.status {
        validate_status(status)?;
    }

    let equipment = EquipmentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// GET /api/v1/equipment/available
pub async fn list_available(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Equipment>>> {
    let items = EquipmentRepo::list_available(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/v1/equipment/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Equipment>> {
    let equipment = EquipmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))?;
    Ok(Json(equipment))
}

/// PUT /api/v1/equipment/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    if let Some(ref status) = input.status {
        validate_status(status)?;
    }

    let equipment = EquipmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))?;
    Ok(Json(equipment))
}

/// DELETE /api/v1/equipment/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EquipmentRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// GET /api/v1/equipment/assignments
pub async fn list_assignments(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProjectScopeParams>,
) -> AppResult<Json<Vec<EquipmentAssignment>>> {
    let items = EquipmentRepo::list_assignments(&state.pool, params.project_id).await?;
    Ok(Json(items))
}

/// POST /api/v1/equipment/assignments
///
/// Assigning equipment that is not `available` returns 409.
pub async fn create_assignment(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEquipmentAssignment>,
) -> AppResult<(StatusCode, Json<EquipmentAssignment>)> {
    let equipment = EquipmentRepo::find_by_id(&state.pool, input.equipment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id: input.equipment_id,
        }))?;

    let assignment = EquipmentRepo::assign(&state.pool, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Equipment {} is not available (status: {})",
                equipment.name, equipment.status
            )))
        })?;

    state.event_bus.publish(
        ActivityEvent::new(
            "equipment.assigned",
            format!("Equipment {} assigned", equipment.name),
        )
        .with_actor(user.user_id)
        .with_project(input.project_id)
        .with_target("equipment", input.equipment_id),
    );

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// DELETE /api/v1/equipment/assignments/{id}
///
/// Ends the assignment and returns the equipment to `available`.
pub async fn end_assignment(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let ended = EquipmentRepo::end_assignment(&state.pool, id).await?;
    if ended {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "EquipmentAssignment",
            id,
        }))
    }
}

fn validate_status(status: &str) -> AppResult<()> {
    if !VALID_EQUIPMENT_STATUSES.contains(&status) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown equipment status: {status}"
        ))));
    }
    Ok(())
}
