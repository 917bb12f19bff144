//! Handlers for the per-project readiness checklist.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::progress::readiness_percent;
use cometa_core::types::DbId;
use cometa_db::models::readiness::{CreateReadinessItem, ReadinessItem, UpdateReadinessItem};
use cometa_db::repositories::{ProjectRepo, ReadinessRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Checklist response: items grouped by category plus the overall percent.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub project_id: DbId,
    /// Percent of completed required items.
    pub percent: f64,
    /// Items grouped by category, categories in alphabetical order.
    pub categories: Vec<ReadinessCategory>,
}

#[derive(Debug, Serialize)]
pub struct ReadinessCategory {
    pub category: String,
    pub items: Vec<ReadinessItem>,
}

/// GET /api/v1/projects/{id}/readiness
pub async fn get_checklist(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ReadinessResponse>> {
    ensure_project_exists(&state, project_id).await?;

    let items = ReadinessRepo::list_by_project(&state.pool, project_id).await?;
    let (completed_required, total_required) =
        ReadinessRepo::required_counts(&state.pool, project_id).await?;

    let mut grouped: BTreeMap<String, Vec<ReadinessItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.category.clone()).or_default().push(item);
    }

    Ok(Json(ReadinessResponse {
        project_id,
        percent: readiness_percent(completed_required, total_required),
        categories: grouped
            .into_iter()
            .map(|(category, items)| ReadinessCategory { category, items })
            .collect(),
    }))
}

/// POST /api/v1/projects/{id}/readiness
pub async fn create_item(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateReadinessItem>,
) -> AppResult<(StatusCode, Json<ReadinessItem>)> {
    ensure_project_exists(&state, project_id).await?;
    if input.title.trim().is_empty() || input.category.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category and title are required".into(),
        )));
    }

    let item = ReadinessRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/v1/readiness/{id}
///
/// Toggling `completed` stamps or clears the completion timestamp.
pub async fn update_item(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReadinessItem>,
) -> AppResult<Json<ReadinessItem>> {
    let item = ReadinessRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReadinessItem",
            id,
        }))?;
    Ok(Json(item))
}

/// DELETE /api/v1/readiness/{id}
pub async fn delete_item(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ReadinessRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ReadinessItem",
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
