//! Route definitions for the `/crews` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::crew;
use crate::state::AppState;

/// Routes mounted at `/crews`.
///
/// ```text
/// GET    /                          -> list (?project_id=)
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (removes member rows)
/// GET    /{id}/members              -> list_members
/// POST   /{id}/members              -> add_member
/// DELETE /{id}/members/{user_id}    -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(crew::list).post(crew::create))
        .route(
            "/{id}",
            get(crew::get_by_id).put(crew::update).delete(crew::delete),
        )
        .route(
            "/{id}/members",
            get(crew::list_members).post(crew::add_member),
        )
        .route("/{id}/members/{user_id}", delete(crew::remove_member))
}
