//! Handlers for segments (zone layout routing sections).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::types::DbId;
use cometa_db::models::segment::{
    CreateSegment, Segment, UpdateSegment, VALID_AREAS, VALID_SEGMENT_STATUSES, VALID_SURFACES,
};
use cometa_db::repositories::{CabinetRepo, SegmentRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/cabinets/{cabinet_id}/segments
pub async fn list_by_cabinet(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(cabinet_id): Path<DbId>,
) -> AppResult<Json<Vec<Segment>>> {
    ensure_cabinet_exists(&state, cabinet_id).await?;
    let segments = SegmentRepo::list_by_cabinet(&state.pool, cabinet_id).await?;
    Ok(Json(segments))
}

/// POST /api/v1/cabinets/{cabinet_id}/segments
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(cabinet_id): Path<DbId>,
    Json(input): Json<CreateSegment>,
) -> AppResult<(StatusCode, Json<Segment>)> {
    ensure_cabinet_exists(&state, cabinet_id).await?;

    if input.length_planned_m <= 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Planned length must be positive".into(),
        )));
    }
    validate_enums(input.surface.as_deref(), input.area.as_deref(), None)?;

    let segment = SegmentRepo::create(&state.pool, cabinet_id, &input).await?;
    Ok((StatusCode::CREATED, Json(segment)))
}

/// GET /api/v1/segments/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Segment>> {
    let segment = SegmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Segment",
            id,
        }))?;
    Ok(Json(segment))
}

/// PUT /api/v1/segments/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSegment>,
) -> AppResult<Json<Segment>> {
    if let Some(length) = input.length_planned_m {
        if length <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Planned length must be positive".into(),
            )));
        }
    }
    validate_enums(
        input.surface.as_deref(),
        input.area.as_deref(),
        input.status.as_deref(),
    )?;

    let segment = SegmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Segment",
            id,
        }))?;
    Ok(Json(segment))
}

/// DELETE /api/v1/segments/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SegmentRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Segment",
            id,
        }))
    }
}

fn validate_enums(
    surface: Option<&str>,
    area: Option<&str>,
    status: Option<&str>,
) -> AppResult<()> {
    if let Some(surface) = surface {
        if !VALID_SURFACES.contains(&surface) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown surface: {surface}"
            ))));
        }
    }
    if let Some(area) = area {
        if !VALID_AREAS.contains(&area) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown area: {area}"
            ))));
        }
    }
    if let Some(status) = status {
        if !VALID_SEGMENT_STATUSES.contains(&status) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown segment status: {status}"
            ))));
        }
    }
    Ok(())
}

async fn ensure_cabinet_exists(state: &AppState, cabinet_id: DbId) -> AppResult<()> {
    CabinetRepo::find_by_id(&state.pool, cabinet_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cabinet",
            id: cabinet_id,
        }))?;
    Ok(())
}
