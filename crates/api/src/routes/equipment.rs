//! Route definitions for the `/equipment` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::equipment;
use crate::state::AppState;

/// Routes mounted at `/equipment`.
///
/// Static segments (`/available`, `/assignments`) are registered alongside
/// the `{id}` routes; axum gives them precedence.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /available          -> list_available
/// GET    /assignments        -> list_assignments (?project_id=)
/// POST   /assignments        -> create_assignment
/// DELETE /assignments/{id}   -> end_assignment
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(equipment::list).post(equipment::create))
        .route("/available", get(equipment::list_available))
        .route(
            "/assignments",
            get(equipment::list_assignments).post(equipment::create_assignment),
        )
        .route("/assignments/{id}", delete(equipment::end_assignment))
        .route(
            "/{id}",
            get(equipment::get_by_id)
                .put(equipment::update)
                .delete(equipment::delete),
        )
}
