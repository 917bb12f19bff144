//! Handlers for the `/materials` resource: CRUD, stock adjustment, and
//! allocations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::pagination::{Page, PageParams};
use cometa_core::types::DbId;
use cometa_db::models::material::{
    AllocationFilter, CreateAllocation, CreateMaterial, Material, MaterialAllocation,
    MaterialFilter, MaterialMove, StockAdjustment, UpdateAllocation, UpdateMaterial, VALID_UNITS,
};
use cometa_db::repositories::MaterialRepo;
use cometa_events::ActivityEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /materials`.
#[derive(Debug, Deserialize)]
pub struct ListMaterialsParams {
    pub category: Option<String>,
    pub supplier_id: Option<DbId>,
    pub search: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Request body for `POST /materials/{id}/adjust`.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub quantity: f64,
    pub reason: String,
}

/// Query parameters for `GET /materials/allocations`.
#[derive(Debug, Deserialize)]
pub struct ListAllocationsParams {
    pub project_id: Option<DbId>,
    pub crew_id: Option<DbId>,
    pub material_id: Option<DbId>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/materials
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListMaterialsParams>,
) -> AppResult<Json<Page<Material>>> {
    let filter = MaterialFilter {
        category: params.category,
        supplier_id: params.supplier_id,
        search: params.search,
        low_stock: params.low_stock,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = MaterialRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = MaterialRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/materials
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMaterial>,
) -> AppResult<(StatusCode, Json<Material>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Material name is required".into(),
        )));
    }
    if !VALID_UNITS.contains(&input.unit.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown unit: {}",
            input.unit
        ))));
    }
    if input.current_stock_qty < 0.0 || input.min_stock_level < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Stock quantities must be non-negative".into(),
        )));
    }

    let material = MaterialRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// GET /api/v1/materials/low-stock
pub async fn list_low_stock(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Material>>> {
    let items = MaterialRepo::list_low_stock(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/v1/materials/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Material>> {
    let material = MaterialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))?;
    Ok(Json(material))
}

/// PUT /api/v1/materials/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMaterial>,
) -> AppResult<Json<Material>> {
    if let Some(ref unit) = input.unit {
        if !VALID_UNITS.contains(&unit.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown unit: {unit}"
            ))));
        }
    }

    let material = MaterialRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))?;
    Ok(Json(material))
}

/// DELETE /api/v1/materials/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = MaterialRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))
    }
}

/// POST /api/v1/materials/{id}/adjust
///
/// Apply a signed stock delta with a reason; the new stock clamps at 0.
pub async fn adjust_stock(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdjustStockRequest>,
) -> AppResult<Json<StockAdjustment>> {
    if input.quantity == 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Quantity must be non-zero".into(),
        )));
    }
    if input.reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Reason is required".into(),
        )));
    }

    let adjustment = MaterialRepo::adjust_stock(&state.pool, id, input.quantity, &input.reason)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))?;

    state.event_bus.publish(
        ActivityEvent::new(
            "material.stock_adjusted",
            format!("Stock of material {id} adjusted by {}", input.quantity),
        )
        .with_actor(user.user_id)
        .with_target("material", id)
        .with_payload(serde_json::json!({
            "old_quantity": adjustment.old_quantity,
            "new_quantity": adjustment.new_quantity,
            "reason": input.reason,
        })),
    );

    Ok(Json(adjustment))
}

/// GET /api/v1/materials/{id}/moves
pub async fn list_moves(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<MaterialMove>>> {
    MaterialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))?;
    let moves = MaterialRepo::list_moves(&state.pool, id, 100).await?;
    Ok(Json(moves))
}

// ---------------------------------------------------------------------------
// Allocations
// ---------------------------------------------------------------------------

/// GET /api/v1/materials/allocations
pub async fn list_allocations(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListAllocationsParams>,
) -> AppResult<Json<Page<MaterialAllocation>>> {
    let filter = AllocationFilter {
        project_id: params.project_id,
        crew_id: params.crew_id,
        material_id: params.material_id,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = MaterialRepo::list_allocations(&state.pool, &filter, limit, offset).await?;
    let total = MaterialRepo::count_allocations(&state.pool, &filter).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/materials/allocations
///
/// Allocating more than the available (unreserved) stock returns 409.
pub async fn create_allocation(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAllocation>,
) -> AppResult<(StatusCode, Json<MaterialAllocation>)> {
    if input.allocated_qty <= 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Allocated quantity must be positive".into(),
        )));
    }
    if input.project_id.is_none() && input.crew_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Allocation needs a project or crew target".into(),
        )));
    }

    MaterialRepo::find_by_id(&state.pool, input.material_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id: input.material_id,
        }))?;

    let allocation = MaterialRepo::allocate(&state.pool, user.user_id, &input).await?;

    state.event_bus.publish({
        let mut event = ActivityEvent::new(
            "material.allocated",
            format!(
                "{} {} of {} allocated",
                allocation.allocated_qty,
                allocation.material_unit.as_deref().unwrap_or(""),
                allocation.material_name.as_deref().unwrap_or("material"),
            ),
        )
        .with_actor(user.user_id)
        .with_target("material_allocation", allocation.id);
        if let Some(project_id) = allocation.project_id {
            event = event.with_project(project_id);
        }
        event
    });

    Ok((StatusCode::CREATED, Json(allocation)))
}

/// PUT /api/v1/materials/allocations/{id}
///
/// Record consumption; `used_qty` may not exceed the allocated quantity.
pub async fn update_allocation(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAllocation>,
) -> AppResult<Json<MaterialAllocation>> {
    if input.used_qty < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Used quantity must be non-negative".into(),
        )));
    }

    let existing = MaterialRepo::find_allocation(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaterialAllocation",
            id,
        }))?;
    if input.used_qty > existing.allocated_qty {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Used quantity {} exceeds allocated {}",
            input.used_qty, existing.allocated_qty
        ))));
    }

    let allocation = MaterialRepo::update_allocation(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaterialAllocation",
            id,
        }))?;
    Ok(Json(allocation))
}

/// DELETE /api/v1/materials/allocations/{id}
///
/// Releases the reservation back to the warehouse.
pub async fn delete_allocation(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let released = MaterialRepo::release_allocation(&state.pool, id).await?;
    if released {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "MaterialAllocation",
            id,
        }))
    }
}
