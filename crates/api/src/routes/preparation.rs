//! Route definitions for preparation sub-resources addressed by their own
//! IDs (creation is nested under `/projects/{project_id}/...`).

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{preparation, readiness};
use crate::state::AppState;

/// Routes mounted at `/utility-contacts`.
pub fn utility_contact_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(preparation::update_utility_contact).delete(preparation::delete_utility_contact),
    )
}

/// Routes mounted at `/facilities`.
pub fn facility_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(preparation::update_facility).delete(preparation::delete_facility),
    )
}

/// Routes mounted at `/housing`.
pub fn housing_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(preparation::get_housing)
            .put(preparation::update_housing)
            .delete(preparation::delete_housing),
    )
}

/// Routes mounted at `/plans`.
pub fn plan_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(preparation::delete_plan))
}

/// Routes mounted at `/readiness`.
pub fn readiness_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(readiness::update_item).delete(readiness::delete_item),
    )
}

