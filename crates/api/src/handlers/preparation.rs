//! Handlers for project preparation: the aggregated summary, utility
//! contacts, facilities, housing units, and plan document uploads.

use axum::extract::multipart::Multipart;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::progress::{project_budget, readiness_percent};
use cometa_core::types::DbId;
use cometa_db::models::preparation::{
    CreateFacility, CreateHousingUnit, CreateUtilityContact, Facility, HousingUnit,
    NewProjectPlan, PreparationSummary, ProjectPlan, UpdateFacility, UpdateHousingUnit,
    UpdateUtilityContact, UtilityContact, VALID_FACILITY_STATUSES, VALID_HOUSING_STATUSES,
};
use cometa_db::repositories::{
    FacilityRepo, HousingUnitRepo, ProjectPlanRepo, ProjectRepo, ReadinessRepo,
    UtilityContactRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::upload;

/// GET /api/v1/projects/{id}/preparation
///
/// Aggregated preparation snapshot for the project dashboard.
pub async fn summary(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<PreparationSummary>> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let utility_contact_count =
        UtilityContactRepo::count_by_project(&state.pool, project_id).await?;
    let facility_count = FacilityRepo::count_by_project(&state.pool, project_id).await?;
    let housing_unit_count = HousingUnitRepo::count_by_project(&state.pool, project_id).await?;
    let plan_count = ProjectPlanRepo::count_by_project(&state.pool, project_id).await?;
    let (completed_required, total_required) =
        ReadinessRepo::required_counts(&state.pool, project_id).await?;

    Ok(Json(PreparationSummary {
        project_id,
        potential_revenue: project_budget(project.total_length_m, project.base_rate_per_m),
        utility_contact_count,
        facility_count,
        housing_unit_count,
        plan_count,
        readiness_percent: readiness_percent(completed_required, total_required),
    }))
}

// ---------------------------------------------------------------------------
// Utility contacts
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/utility-contacts
pub async fn list_utility_contacts(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<UtilityContact>>> {
    ensure_project_exists(&state, project_id).await?;
    let contacts = UtilityContactRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(contacts))
}

/// POST /api/v1/projects/{id}/utility-contacts
pub async fn create_utility_contact(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateUtilityContact>,
) -> AppResult<(StatusCode, Json<UtilityContact>)> {
    ensure_project_exists(&state, project_id).await?;
    if input.organization.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Organization is required".into(),
        )));
    }

    let contact = UtilityContactRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /api/v1/utility-contacts/{id}
pub async fn update_utility_contact(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUtilityContact>,
) -> AppResult<Json<UtilityContact>> {
    let contact = UtilityContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "UtilityContact",
            id,
        }))?;
    Ok(Json(contact))
}

/// DELETE /api/v1/utility-contacts/{id}
pub async fn delete_utility_contact(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = UtilityContactRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "UtilityContact",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Facilities
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/facilities
pub async fn list_facilities(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Facility>>> {
    ensure_project_exists(&state, project_id).await?;
    let facilities = FacilityRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(facilities))
}

/// POST /api/v1/projects/{id}/facilities
pub async fn create_facility(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateFacility>,
) -> AppResult<(StatusCode, Json<Facility>)> {
    ensure_project_exists(&state, project_id).await?;
    if let Some(ref status) = input.status {
        validate_facility_status(status)?;
    }

    let facility = FacilityRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(facility)))
}

/// PUT /api/v1/facilities/{id}
pub async fn update_facility(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFacility>,
) -> AppResult<Json<Facility>> {
    if let Some(ref status) = input.status {
        validate_facility_status(status)?;
    }

    let facility = FacilityRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Facility",
            id,
        }))?;
    Ok(Json(facility))
}

/// DELETE /api/v1/facilities/{id}
pub async fn delete_facility(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = FacilityRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Facility",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Housing units
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/housing
pub async fn list_housing(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<HousingUnit>>> {
    ensure_project_exists(&state, project_id).await?;
    let units = HousingUnitRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(units))
}

/// POST /api/v1/projects/{id}/housing
pub async fn create_housing(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateHousingUnit>,
) -> AppResult<(StatusCode, Json<HousingUnit>)> {
    ensure_project_exists(&state, project_id).await?;
    if input.address.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Address is required".into(),
        )));
    }
    if let Some(ref status) = input.status {
        validate_housing_status(status)?;
    }

    let unit = HousingUnitRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// GET /api/v1/housing/{id}
pub async fn get_housing(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<HousingUnit>> {
    let unit = HousingUnitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HousingUnit",
            id,
        }))?;
    Ok(Json(unit))
}

/// PUT /api/v1/housing/{id}
///
/// Occupied beds may not exceed total beds.
pub async fn update_housing(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHousingUnit>,
) -> AppResult<Json<HousingUnit>> {
    if let Some(ref status) = input.status {
        validate_housing_status(status)?;
    }

    let existing = HousingUnitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HousingUnit",
            id,
        }))?;

    let beds = input.beds.unwrap_or(existing.beds);
    let occupied = input.occupied_beds.unwrap_or(existing.occupied_beds);
    if occupied > beds {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Occupied beds {occupied} exceeds total beds {beds}"
        ))));
    }

    let unit = HousingUnitRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HousingUnit",
            id,
        }))?;
    Ok(Json(unit))
}

/// DELETE /api/v1/housing/{id}
pub async fn delete_housing(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = HousingUnitRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "HousingUnit",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Plan documents
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/plans
pub async fn list_plans(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectPlan>>> {
    ensure_project_exists(&state, project_id).await?;
    let plans = ProjectPlanRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(plans))
}

/// POST /api/v1/projects/{id}/plans
///
/// Multipart upload. Fields: `file` (required), `title` (defaults to the
/// filename).
pub async fn upload_plan(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectPlan>)> {
    ensure_project_exists(&state, project_id).await?;

    let mut stored = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
                stored = Some(
                    upload::store_field(
                        &state.config.upload_dir,
                        &format!("plans/{project_id}"),
                        filename.as_deref(),
                        content_type.as_deref(),
                        &data,
                    )
                    .await?,
                );
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Invalid title field: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let stored = stored.ok_or_else(|| AppError::BadRequest("Missing file field".into()))?;

    let plan = ProjectPlanRepo::create(
        &state.pool,
        &NewProjectPlan {
            project_id,
            title: title.unwrap_or_else(|| stored.filename.clone()),
            filename: stored.filename.clone(),
            file_path: stored.path.to_string_lossy().into_owned(),
            mime_type: stored.content_type.clone(),
            size_bytes: Some(stored.size_bytes),
            uploaded_by: Some(user.user_id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

/// DELETE /api/v1/plans/{id}
pub async fn delete_plan(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let plan = ProjectPlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectPlan",
            id,
        }))?;

    ProjectPlanRepo::delete(&state.pool, id).await?;

    // Best-effort removal of the stored file; a missing file is not an error.
    if let Err(e) = tokio::fs::remove_file(&plan.file_path).await {
        tracing::warn!(error = %e, path = %plan.file_path, "Failed to remove plan file");
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_facility_status(status: &str) -> AppResult<()> {
    if !VALID_FACILITY_STATUSES.contains(&status) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown facility status: {status}"
        ))));
    }
    Ok(())
}

fn validate_housing_status(status: &str) -> AppResult<()> {
    if !VALID_HOUSING_STATUSES.contains(&status) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown housing status: {status}"
        ))));
    }
    Ok(())
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
