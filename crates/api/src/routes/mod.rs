//! Route tree assembly.

pub mod activity;
pub mod auth;
pub mod crew;
pub mod equipment;
pub mod health;
pub mod material;
pub mod notification;
pub mod preparation;
pub mod project;
pub mod supplier;
pub mod users;
pub mod work_entry;
pub mod zone;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
///
/// /users                                    list, create (admin only)
/// /users/{id}                               get, update, deactivate
/// /users/{id}/pin                           reset PIN
///
/// /projects                                 list, create
/// /projects/{id}                            get, update, delete
/// /projects/{id}/summary                    derived dashboard figures
/// /projects/{project_id}/cabinets           list, create
/// /projects/{project_id}/preparation        preparation snapshot
/// /projects/{project_id}/utility-contacts   list, create
/// /projects/{project_id}/facilities         list, create
/// /projects/{project_id}/housing            list, create
/// /projects/{project_id}/plans              list, upload (multipart)
/// /projects/{project_id}/readiness          checklist, add item
///
/// /cabinets/{id}                            get, update, delete
/// /cabinets/{cabinet_id}/segments           list, create
/// /segments/{id}                            get, update, delete
///
/// /work-entries                             list, create
/// /work-entries/{id}                        get, update, delete
/// /work-entries/{id}/approve                approve (foreman/pm/admin)
/// /work-entries/{id}/photos                 list, upload (multipart)
///
/// /crews                                    list, create
/// /crews/{id}                               get, update, delete
/// /crews/{id}/members                       list, add
/// /crews/{id}/members/{user_id}             remove
///
/// /equipment                                list, create
/// /equipment/available                      unassigned available equipment
/// /equipment/assignments                    list, create
/// /equipment/assignments/{id}               end assignment
/// /equipment/{id}                           get, update, delete
///
/// /materials                                list, create
/// /materials/low-stock                      below minimum stock
/// /materials/allocations                    list, create
/// /materials/allocations/{id}               record usage, release
/// /materials/orders                         list, create
/// /materials/orders/{id}                    get with items, update
/// /materials/{id}                           get, update, delete
/// /materials/{id}/adjust                    signed stock adjustment
/// /materials/{id}/moves                     movement history
///
/// /suppliers                                list, create
/// /suppliers/{id}                           get, update, delete
///
/// /utility-contacts/{id}                    update, delete
/// /facilities/{id}                          update, delete
/// /housing/{id}                             get, update, delete
/// /plans/{id}                               delete
/// /readiness/{id}                           update, delete
///
/// /activities                               audit feed (filters)
/// /activities/stats                         per-type counts
///
/// /notifications                            list
/// /notifications/unread-count               unread count
/// /notifications/read-all                   mark all read
/// /notifications/{id}/read                  mark read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Admin user management.
        .nest("/users", users::router())
        // Projects (also nests cabinets and preparation sub-resources).
        .nest("/projects", project::router())
        // Zone layout addressed by cabinet/segment IDs.
        .nest("/cabinets", zone::cabinet_router())
        .nest("/segments", zone::segment_router())
        // Work entries, approval, photos.
        .nest("/work-entries", work_entry::router())
        // Crews and membership.
        .nest("/crews", crew::router())
        // Equipment inventory and assignments.
        .nest("/equipment", equipment::router())
        // Materials: stock, allocations, orders.
        .nest("/materials", material::router())
        // Suppliers.
        .nest("/suppliers", supplier::router())
        // Preparation sub-resources addressed by their own IDs.
        .nest("/utility-contacts", preparation::utility_contact_router())
        .nest("/facilities", preparation::facility_router())
        .nest("/housing", preparation::housing_router())
        .nest("/plans", preparation::plan_router())
        .nest("/readiness", preparation::readiness_router())
        // Activity audit feed.
        .nest("/activities", activity::router())
        // Notifications.
        .nest("/notifications", notification::router())
}
