//! Handlers for the `/materials/orders` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cometa_core::error::CoreError;
use cometa_core::pagination::{Page, PageParams};
use cometa_core::types::DbId;
use cometa_db::models::material_order::{
    CreateOrder, MaterialOrder, MaterialOrderItem, OrderFilter, TERMINAL_ORDER_STATUSES,
    UpdateOrder, VALID_ORDER_STATUSES,
};
use cometa_db::repositories::{MaterialOrderRepo, SupplierRepo};
use cometa_events::ActivityEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /materials/orders`.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub supplier_id: Option<DbId>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// An order with its line items, as returned by `GET /materials/orders/{id}`.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: MaterialOrder,
    pub items: Vec<MaterialOrderItem>,
}

/// GET /api/v1/materials/orders
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> AppResult<Json<Page<MaterialOrder>>> {
    if let Some(ref status) = params.status {
        validate_status(status)?;
    }

    let filter = OrderFilter {
        supplier_id: params.supplier_id,
        status: params.status,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (limit, offset, page, per_page) = page_params.to_limit_offset();

    let items = MaterialOrderRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = MaterialOrderRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// POST /api/v1/materials/orders
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<MaterialOrder>)> {
    if input.order_number.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Order number is required".into(),
        )));
    }
    if input.items.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Order needs at least one item".into(),
        )));
    }
    for item in &input.items {
        if item.quantity <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Item quantities must be positive".into(),
            )));
        }
    }

    SupplierRepo::find_by_id(&state.pool, input.supplier_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Supplier",
            id: input.supplier_id,
        }))?;

    let order = MaterialOrderRepo::create(&state.pool, user.user_id, &input).await?;

    state.event_bus.publish(
        ActivityEvent::new(
            "material_order.created",
            format!("Order {} created", order.order_number),
        )
        .with_actor(user.user_id)
        .with_target("material_order", order.id),
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/v1/materials/orders/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<OrderDetail>> {
    let order = MaterialOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaterialOrder",
            id,
        }))?;
    let items = MaterialOrderRepo::list_items(&state.pool, id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// PUT /api/v1/materials/orders/{id}
///
/// A transition to `delivered` receives items into stock; terminal orders
/// (`delivered`, `cancelled`) return 409.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrder>,
) -> AppResult<Json<MaterialOrder>> {
    if let Some(ref status) = input.status {
        validate_status(status)?;
    }

    let existing = MaterialOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaterialOrder",
            id,
        }))?;
    if TERMINAL_ORDER_STATUSES.contains(&existing.status.as_str()) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Order is {} and cannot be changed",
            existing.status
        ))));
    }

    let order = if input.status.as_deref() == Some("delivered") {
        MaterialOrderRepo::deliver(&state.pool, id).await?
    } else {
        MaterialOrderRepo::update(&state.pool, id, &input).await?
    }
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Order was concurrently finalized".into(),
        ))
    })?;

    state.event_bus.publish(
        ActivityEvent::new(
            "material_order.updated",
            format!("Order {} is now {}", order.order_number, order.status),
        )
        .with_actor(user.user_id)
        .with_target("material_order", order.id),
    );

    Ok(Json(order))
}

fn validate_status(status: &str) -> AppResult<()> {
    if !VALID_ORDER_STATUSES.contains(&status) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown order status: {status}"
        ))));
    }
    Ok(())
}
