//! Route definitions for the `/projects` resource.
//!
//! Also nests cabinets and the preparation sub-resources (utility contacts,
//! facilities, housing, plans, readiness) under `/projects/{project_id}/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{cabinet, preparation, project, readiness};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// GET    /{id}/summary                      -> summary
///
/// GET    /{project_id}/cabinets             -> list_by_project
/// POST   /{project_id}/cabinets             -> create
///
/// GET    /{project_id}/preparation          -> preparation summary
/// GET    /{project_id}/utility-contacts     -> list, POST -> create
/// GET    /{project_id}/facilities           -> list, POST -> create
/// GET    /{project_id}/housing              -> list, POST -> create
/// GET    /{project_id}/plans                -> list, POST -> upload (multipart)
/// GET    /{project_id}/readiness            -> checklist, POST -> add item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/summary", get(project::summary))
        .route(
            "/{project_id}/cabinets",
            get(cabinet::list_by_project).post(cabinet::create),
        )
        .route("/{project_id}/preparation", get(preparation::summary))
        .route(
            "/{project_id}/utility-contacts",
            get(preparation::list_utility_contacts).post(preparation::create_utility_contact),
        )
        .route(
            "/{project_id}/facilities",
            get(preparation::list_facilities).post(preparation::create_facility),
        )
        .route(
            "/{project_id}/housing",
            get(preparation::list_housing).post(preparation::create_housing),
        )
        .route(
            "/{project_id}/plans",
            get(preparation::list_plans).post(preparation::upload_plan),
        )
        .route(
            "/{project_id}/readiness",
            get(readiness::get_checklist).post(readiness::create_item),
        )
}
