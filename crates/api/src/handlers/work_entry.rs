//! Handlers for the `/work-entries` resource, including approval and photo
//! uploads.

use axum::extract::multipart::Multipart;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::pagination::{Page, PageParams};
use cometa_core::stages::{is_valid_method, is_valid_photo_label, is_valid_stage_code};
use cometa_core::types::{Date, DbId};
use cometa_db::models::photo::{NewPhoto, Photo};
use cometa_db::models::work_entry::{
    CreateWorkEntry, UpdateWorkEntry, WorkEntry, WorkEntryFilter,
};
use cometa_db::repositories::{PhotoRepo, ProjectRepo, WorkEntryRepo};
use cometa_events::ActivityEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireApprover;
use crate::state::AppState;
use crate::upload;

/// Query parameters for `GET /work-entries`.
#[derive(Debug, Deserialize)]
pub struct ListEntriesParams {
    pub project_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub stage_code: Option<String>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub approved: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/work-entries
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListEntriesParams>,
) -> AppResult<Json<Page<WorkEntry>>> {
    let filter = WorkEntryFilter {
        project_id: params.project_id,
        user_id: params.user_id,
        crew_id: params.crew_id,
        stage_code: params.stage_code,
        date_from: params.date_from,
        date_to: params.date_to,
        approved: params.approved,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = WorkEntryRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = WorkEntryRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/work-entries
///
/// The author is the authenticated user.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkEntry>,
) -> AppResult<(StatusCode, Json<WorkEntry>)> {
    validate_entry_fields(&input.stage_code, input.meters_done_m, input.method.as_deref())?;

    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    let entry = WorkEntryRepo::create(&state.pool, user.user_id, &input).await?;

    state.event_bus.publish(
        ActivityEvent::new(
            "work_entry.created",
            format!(
                "{} m logged for stage {}",
                entry.meters_done_m, entry.stage_code
            ),
        )
        .with_actor(user.user_id)
        .with_project(entry.project_id)
        .with_target("work_entry", entry.id),
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/work-entries/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<WorkEntry>> {
    let entry = WorkEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkEntry",
            id,
        }))?;
    Ok(Json(entry))
}

/// PUT /api/v1/work-entries/{id}
///
/// Approved entries are immutable (409).
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkEntry>,
) -> AppResult<Json<WorkEntry>> {
    if let Some(ref stage_code) = input.stage_code {
        if !is_valid_stage_code(stage_code) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown stage code: {stage_code}"
            ))));
        }
    }
    if let Some(meters) = input.meters_done_m {
        if meters < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Meters done must be non-negative".into(),
            )));
        }
    }
    if let Some(ref method) = input.method {
        if !is_valid_method(method) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown work method: {method}"
            ))));
        }
    }

    let existing = WorkEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkEntry",
            id,
        }))?;
    if existing.is_approved() {
        return Err(AppError::Core(CoreError::Conflict(
            "Work entry is already approved and cannot be changed".into(),
        )));
    }

    let entry = WorkEntryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkEntry",
            id,
        }))?;

    state.event_bus.publish(
        ActivityEvent::new("work_entry.updated", format!("Work entry {id} updated"))
            .with_actor(user.user_id)
            .with_project(entry.project_id)
            .with_target("work_entry", id),
    );

    Ok(Json(entry))
}

/// DELETE /api/v1/work-entries/{id}
///
/// Approved entries cannot be deleted (409).
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = WorkEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkEntry",
            id,
        }))?;
    if existing.is_approved() {
        return Err(AppError::Core(CoreError::Conflict(
            "Work entry is already approved and cannot be deleted".into(),
        )));
    }

    let deleted = WorkEntryRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "WorkEntry",
            id,
        }));
    }

    state.event_bus.publish(
        ActivityEvent::new("work_entry.deleted", format!("Work entry {id} deleted"))
            .with_actor(user.user_id)
            .with_project(existing.project_id)
            .with_target("work_entry", id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/work-entries/{id}/approve
///
/// Approver roles only. Approving twice returns 409.
pub async fn approve(
    RequireApprover(user): RequireApprover,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<WorkEntry>> {
    let existing = WorkEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkEntry",
            id,
        }))?;
    if existing.is_approved() {
        return Err(AppError::Core(CoreError::Conflict(
            "Work entry is already approved".into(),
        )));
    }

    // The guard inside approve() catches a concurrent approval between the
    // check above and the update.
    let entry = WorkEntryRepo::approve(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Work entry is already approved".into(),
            ))
        })?;

    state.event_bus.publish(
        ActivityEvent::new("work_entry.approved", format!("Work entry {id} approved"))
            .with_actor(user.user_id)
            .with_project(entry.project_id)
            .with_target("work_entry", id),
    );

    Ok(Json(entry))
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

/// GET /api/v1/work-entries/{id}/photos
pub async fn list_photos(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Photo>>> {
    ensure_entry_exists(&state, id).await?;
    let photos = PhotoRepo::list_by_work_entry(&state.pool, id).await?;
    Ok(Json(photos))
}

/// POST /api/v1/work-entries/{id}/photos
///
/// Multipart upload. Fields: `file` (required), `label`, `gps_lat`, `gps_lon`.
pub async fn upload_photo(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Photo>)> {
    ensure_entry_exists(&state, id).await?;

    let mut stored = None;
    let mut label: Option<String> = None;
    let mut gps_lat: Option<f64> = None;
    let mut gps_lon: Option<f64> = None;

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
                        &format!("work-entries/{id}"),
                        filename.as_deref(),
                        content_type.as_deref(),
                        &data,
                    )
                    .await?,
                );
            }
            "label" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid label field: {e}")))?;
                if !is_valid_photo_label(&value) {
                    return Err(AppError::Core(CoreError::Validation(format!(
                        "Unknown photo label: {value}"
                    ))));
                }
                label = Some(value);
            }
            "gps_lat" => {
                gps_lat = Some(parse_float_field(field).await?);
            }
            "gps_lon" => {
                gps_lon = Some(parse_float_field(field).await?);
            }
            _ => {}
        }
    }

    let stored = stored.ok_or_else(|| AppError::BadRequest("Missing file field".into()))?;

    let photo = PhotoRepo::create(
        &state.pool,
        &NewPhoto {
            work_entry_id: id,
            file_path: stored.path.to_string_lossy().into_owned(),
            gps_lat,
            gps_lon,
            label,
            author_user_id: Some(user.user_id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(photo)))
}

async fn parse_float_field(field: axum::extract::multipart::Field<'_>) -> AppResult<f64> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid field: {e}")))?;
    text.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid coordinate: {text}")))
}

fn validate_entry_fields(stage_code: &str, meters: f64, method: Option<&str>) -> AppResult<()> {
    if !is_valid_stage_code(stage_code) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown stage code: {stage_code}"
        ))));
    }
    if meters < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Meters done must be non-negative".into(),
        )));
    }
    if let Some(method) = method {
        if !is_valid_method(method) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown work method: {method}"
            ))));
        }
    }
    Ok(())
}

async fn ensure_entry_exists(state: &AppState, id: DbId) -> AppResult<()> {
    WorkEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkEntry",
            id,
        }))?;
    Ok(())
}
