//! Route definitions for the `/activities` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activities`.
///
/// ```text
/// GET /         -> list (filters + pagination, default 50 per page)
/// GET /stats    -> per-type counts over an optional date range
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(activity::list))
        .route("/stats", get(activity::stats))
}
