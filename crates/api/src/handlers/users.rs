//! Handlers for the `/users` resource (admin user management).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::pagination::{Page, PageParams};
use cometa_core::roles::{is_valid_language, is_valid_role};
use cometa_core::types::DbId;
use cometa_db::models::user::{NewUser, UpdateUser, User, UserFilter};
use cometa_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::pin::{hash_pin, validate_pin_format};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for `GET /users`.
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub role: Option<String>,
    pub active: Option<bool>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lang_pref: Option<String>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
    pub pin_code: String,
}

/// Request body for `POST /users/{id}/pin`.
#[derive(Debug, Deserialize)]
pub struct SetPinRequest {
    pub pin_code: String,
}

/// GET /api/v1/users
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> AppResult<Json<Page<User>>> {
    let filter = UserFilter {
        role: params.role,
        is_active: params.active,
        search: params.search,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = UserRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = UserRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/users
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "First and last name are required".into(),
        )));
    }
    if input.email.is_none() && input.phone.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Email or phone is required".into(),
        )));
    }
    validate_pin_format(&input.pin_code)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.unwrap_or_else(|| "worker".to_string());
    if !is_valid_role(&role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role: {role}"
        ))));
    }

    let lang_pref = input.lang_pref.unwrap_or_else(|| "de".to_string());
    if !is_valid_language(&lang_pref) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unsupported language: {lang_pref}"
        ))));
    }

    let pin_hash = hash_pin(&input.pin_code)
        .map_err(|e| AppError::InternalError(format!("PIN hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            lang_pref,
            role,
            skills: input.skills,
            pin_hash,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    if let Some(ref role) = input.role {
        if !is_valid_role(role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role: {role}"
            ))));
        }
    }
    if let Some(ref lang) = input.lang_pref {
        if !is_valid_language(lang) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unsupported language: {lang}"
            ))));
        }
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user))
}

/// DELETE /api/v1/users/{id}
///
/// Deactivates the account rather than removing the row, so historic work
/// entries keep their author.
pub async fn deactivate(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if deactivated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

/// POST /api/v1/users/{id}/pin
///
/// Admin reset of a user's PIN.
pub async fn set_pin(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetPinRequest>,
) -> AppResult<StatusCode> {
    validate_pin_format(&input.pin_code)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let pin_hash = hash_pin(&input.pin_code)
        .map_err(|e| AppError::InternalError(format!("PIN hashing error: {e}")))?;

    let updated = UserRepo::update_pin(&state.pool, id, &pin_hash).await?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}
