//! Route definitions for zone layout: cabinets and segments addressed by
//! their own IDs (creation is nested under projects/cabinets).

use axum::routing::get;
use axum::Router;

use crate::handlers::{cabinet, segment};
use crate::state::AppState;

/// Routes mounted at `/cabinets`.
///
/// ```text
/// GET    /{id}                       -> get_by_id
/// PUT    /{id}                       -> update
/// DELETE /{id}                       -> delete
/// GET    /{cabinet_id}/segments      -> list_by_cabinet
/// POST   /{cabinet_id}/segments      -> create
/// ```
pub fn cabinet_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(cabinet::get_by_id)
                .put(cabinet::update)
                .delete(cabinet::delete),
        )
        .route(
            "/{cabinet_id}/segments",
            get(segment::list_by_cabinet).post(segment::create),
        )
}

/// Routes mounted at `/segments`.
///
/// ```text
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn segment_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(segment::get_by_id)
            .put(segment::update)
            .delete(segment::delete),
    )
}
