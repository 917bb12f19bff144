//! Route definitions for the `/materials` resource: CRUD, stock, allocations,
//! and orders.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{material, material_order};
use crate::state::AppState;

/// Routes mounted at `/materials`.
///
/// Static segments (`/low-stock`, `/allocations`, `/orders`) are registered
/// alongside the `{id}` routes; axum gives them precedence.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /low-stock           -> list_low_stock
///
/// GET    /allocations         -> list_allocations
/// POST   /allocations         -> create_allocation
/// PUT    /allocations/{id}    -> update_allocation (used qty)
/// DELETE /allocations/{id}    -> delete_allocation (release)
///
/// GET    /orders              -> list orders
/// POST   /orders              -> create order (with items)
/// GET    /orders/{id}         -> order with items
/// PUT    /orders/{id}         -> update / status transition
///
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// POST   /{id}/adjust         -> adjust_stock
/// GET    /{id}/moves          -> list_moves
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(material::list).post(material::create))
        .route("/low-stock", get(material::list_low_stock))
        .route(
            "/allocations",
            get(material::list_allocations).post(material::create_allocation),
        )
        .route(
            "/allocations/{id}",
            delete(material::delete_allocation).put(material::update_allocation),
        )
        .route(
            "/orders",
            get(material_order::list).post(material_order::create),
        )
        .route(
            "/orders/{id}",
            get(material_order::get_by_id).put(material_order::update),
        )
        .route(
            "/{id}",
            get(material::get_by_id)
                .put(material::update)
                .delete(material::delete),
        )
        .route("/{id}/adjust", post(material::adjust_stock))
        .route("/{id}/moves", get(material::list_moves))
}
