//! Route definitions for the `/work-entries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work_entry;
use crate::state::AppState;

/// Routes mounted at `/work-entries`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/approve   -> approve (foreman/pm/admin)
/// GET    /{id}/photos    -> list_photos
/// POST   /{id}/photos    -> upload_photo (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(work_entry::list).post(work_entry::create))
        .route(
            "/{id}",
            get(work_entry::get_by_id)
                .put(work_entry::update)
                .delete(work_entry::delete),
        )
        .route("/{id}/approve", post(work_entry::approve))
        .route(
            "/{id}/photos",
            get(work_entry::list_photos).post(work_entry::upload_photo),
        )
}
