//! Handlers for cabinets (zone layout distribution points).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::types::DbId;
use cometa_db::models::cabinet::{Cabinet, CreateCabinet, UpdateCabinet};
use cometa_db::repositories::{CabinetRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/cabinets
pub async fn list_by_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Cabinet>>> {
    ensure_project_exists(&state, project_id).await?;
    let cabinets = CabinetRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(cabinets))
}

/// POST /api/v1/projects/{project_id}/cabinets
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateCabinet>,
) -> AppResult<(StatusCode, Json<Cabinet>)> {
    ensure_project_exists(&state, project_id).await?;
    let cabinet = CabinetRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(cabinet)))
}

/// GET /api/v1/cabinets/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Cabinet>> {
    let cabinet = CabinetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cabinet",
            id,
        }))?;
    Ok(Json(cabinet))
}

/// PUT /api/v1/cabinets/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCabinet>,
) -> AppResult<Json<Cabinet>> {
    let cabinet = CabinetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cabinet",
            id,
        }))?;
    Ok(Json(cabinet))
}

/// DELETE /api/v1/cabinets/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CabinetRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Cabinet",
            id,
        }))
    }
}

async fn ensure_project_exists(state: &AppState, project_id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(())
}
