//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::pagination::{Page, PageParams};
use cometa_core::roles::can_manage_projects;
use cometa_core::types::DbId;
use cometa_db::models::project::{
    CreateProject, Project, ProjectFilter, ProjectSummary, UpdateProject,
    VALID_PROJECT_STATUSES,
};
use cometa_db::repositories::{ProjectRepo, UserRepo};
use cometa_events::ActivityEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::state::AppState;

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub pm_user_id: Option<DbId>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// A project item with its derived budget, as returned by list/get.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub budget: f64,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        let budget = project.budget();
        Self { project, budget }
    }
}

/// GET /api/v1/projects
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListProjectsParams>,
) -> AppResult<Json<Page<ProjectResponse>>> {
    if let Some(ref status) = params.status {
        if !VALID_PROJECT_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown project status: {status}"
            ))));
        }
    }

    let filter = ProjectFilter {
        status: params.status,
        search: params.search,
        city: params.city,
        pm_user_id: params.pm_user_id,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = ProjectRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = ProjectRepo::count(&state.pool, &filter).await?;
    let items = items.into_iter().map(ProjectResponse::from).collect();
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/projects
pub async fn create(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name is required".into(),
        )));
    }
    if input.total_length_m < 0.0 || input.base_rate_per_m < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Length and rate must be non-negative".into(),
        )));
    }

    // The assigned PM must exist and hold a managing role.
    if let Some(pm_id) = input.pm_user_id {
        let pm = UserRepo::find_by_id(&state.pool, pm_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "PM user {pm_id} does not exist"
                )))
            })?;
        if !can_manage_projects(&pm.role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "User {pm_id} cannot manage projects (role: {})",
                pm.role
            ))));
        }
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;

    state.event_bus.publish(
        ActivityEvent::new("project.created", format!("Project {} created", project.name))
            .with_actor(user.user_id)
            .with_project(project.id)
            .with_target("project", project.id),
    );

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectResponse>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project.into()))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ProjectResponse>> {
    if let Some(ref status) = input.status {
        if !VALID_PROJECT_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown project status: {status}"
            ))));
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    state.event_bus.publish(
        ActivityEvent::new("project.updated", format!("Project {} updated", project.name))
            .with_actor(user.user_id)
            .with_project(project.id)
            .with_target("project", project.id),
    );

    Ok(Json(project.into()))
}

/// DELETE /api/v1/projects/{id}
///
/// Refused while work entries reference the project.
pub async fn delete(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let entry_count = ProjectRepo::work_entry_count(&state.pool, id).await?;
    if entry_count > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Project has {entry_count} work entries and cannot be deleted"
        ))));
    }

    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }

    state.event_bus.publish(
        ActivityEvent::new("project.deleted", format!("Project {id} deleted"))
            .with_actor(user.user_id)
            .with_target("project", id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/summary
pub async fn summary(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectSummary>> {
    let summary = ProjectRepo::summary(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(summary))
}
