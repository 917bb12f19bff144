//! Handlers for the `/crews` resource and crew membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::types::DbId;
use cometa_db::models::crew::{AddCrewMember, Crew, CrewMember, CreateCrew, UpdateCrew};
use cometa_db::repositories::{CrewRepo, UserRepo};
use cometa_events::ActivityEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectScopeParams;
use crate::state::AppState;

/// GET /api/v1/crews
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProjectScopeParams>,
) -> AppResult<Json<Vec<Crew>>> {
    let crews = CrewRepo::list(&state.pool, params.project_id).await?;
    Ok(Json(crews))
}

/// POST /api/v1/crews
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCrew>,
) -> AppResult<(StatusCode, Json<Crew>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Crew name is required".into(),
        )));
    }
    if let Some(foreman_id) = input.foreman_user_id {
        UserRepo::find_by_id(&state.pool, foreman_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Foreman user {foreman_id} does not exist"
                )))
            })?;
    }

    let crew = CrewRepo::create(&state.pool, &input).await?;

    state.event_bus.publish(
        ActivityEvent::new("crew.created", format!("Crew {} created", crew.name))
            .with_actor(user.user_id)
            .with_target("crew", crew.id),
    );

    Ok((StatusCode::CREATED, Json(crew)))
}

/// GET /api/v1/crews/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Crew>> {
    let crew = CrewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Crew", id }))?;
    Ok(Json(crew))
}

/// PUT /api/v1/crews/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCrew>,
) -> AppResult<Json<Crew>> {
    let crew = CrewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Crew", id }))?;
    Ok(Json(crew))
}

/// DELETE /api/v1/crews/{id}
///
/// Member rows are removed in the same transaction.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CrewRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Crew", id }));
    }

    state.event_bus.publish(
        ActivityEvent::new("crew.deleted", format!("Crew {id} deleted"))
            .with_actor(user.user_id)
            .with_target("crew", id),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// GET /api/v1/crews/{id}/members
pub async fn list_members(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<CrewMember>>> {
    ensure_crew_exists(&state, id).await?;
    let members = CrewRepo::list_members(&state.pool, id).await?;
    Ok(Json(members))
}

/// POST /api/v1/crews/{id}/members
///
/// Adding the same user twice returns 409 (unique constraint).
pub async fn add_member(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddCrewMember>,
) -> AppResult<(StatusCode, Json<CrewMember>)> {
    ensure_crew_exists(&state, id).await?;
    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    let member = CrewRepo::add_member(&state.pool, id, input.user_id).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/v1/crews/{id}/members/{user_id}
pub async fn remove_member(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let removed = CrewRepo::remove_member(&state.pool, id, user_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "CrewMember",
            id: user_id,
        }))
    }
}

async fn ensure_crew_exists(state: &AppState, id: DbId) -> AppResult<()> {
    CrewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Crew", id }))?;
    Ok(())
}
