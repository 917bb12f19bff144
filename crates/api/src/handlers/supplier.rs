//! Handlers for the `/suppliers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::pagination::{Page, PageParams};
use cometa_core::types::DbId;
use cometa_db::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};
use cometa_db::repositories::SupplierRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /suppliers`.
#[derive(Debug, Deserialize)]
pub struct ListSuppliersParams {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/suppliers
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListSuppliersParams>,
) -> AppResult<Json<Page<Supplier>>> {
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = SupplierRepo::list(&state.pool, params.search.as_deref(), limit, offset).await?;
    let total = SupplierRepo::count(&state.pool, params.search.as_deref()).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/suppliers
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSupplier>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Supplier name is required".into(),
        )));
    }

    let supplier = SupplierRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// GET /api/v1/suppliers/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Supplier>> {
    let supplier = SupplierRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Supplier",
            id,
        }))?;
    Ok(Json(supplier))
}

/// PUT /api/v1/suppliers/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSupplier>,
) -> AppResult<Json<Supplier>> {
    let supplier = SupplierRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Supplier",
            id,
        }))?;
    Ok(Json(supplier))
}

/// DELETE /api/v1/suppliers/{id}
///
/// Refused while materials or orders reference the supplier.
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let dependents = SupplierRepo::dependent_count(&state.pool, id).await?;
    if dependents > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Supplier is referenced by {dependents} materials or orders"
        ))));
    }

    let deleted = SupplierRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Supplier",
            id,
        }))
    }
}
