//! Handlers for the `/activities` resource (audit feed and statistics).

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveTime, TimeZone, Utc};
use cometa_core::pagination::{Page, PageParams, MAX_PER_PAGE};
use cometa_core::types::{Date, DbId, Timestamp};
use cometa_db::models::activity::{ActivityFilter, ActivityLog, ActivityTypeCount};
use cometa_db::repositories::ActivityRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Activity feeds default to a larger page than other lists.
const ACTIVITY_DEFAULT_PER_PAGE: i64 = 50;

/// Query parameters for `GET /activities`.
#[derive(Debug, Deserialize)]
pub struct ListActivitiesParams {
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub activity_type: Option<String>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Query parameters for `GET /activities/stats`.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
}

/// Response body for `GET /activities/stats`.
#[derive(Debug, Serialize)]
pub struct ActivityStats {
    pub total: i64,
    pub by_type: Vec<ActivityTypeCount>,
}

/// GET /api/v1/activities
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListActivitiesParams>,
) -> AppResult<Json<Page<ActivityLog>>> {
    let filter = ActivityFilter {
        user_id: params.user_id,
        project_id: params.project_id,
        activity_type: params.activity_type,
        date_from: params.date_from.map(start_of_day),
        date_to: params.date_to.map(end_of_day),
        search: params.search,
    };
    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (page, per_page) = page_params.clamp(ACTIVITY_DEFAULT_PER_PAGE, MAX_PER_PAGE);
    let (limit, offset) = (per_page, (page - 1) * per_page);

    let items = ActivityRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = ActivityRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(items, total, page, per_page)))
}

/// GET /api/v1/activities/stats
pub async fn stats(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<Json<ActivityStats>> {
    let by_type = ActivityRepo::stats(
        &state.pool,
        params.date_from.map(start_of_day),
        params.date_to.map(end_of_day),
    )
    .await?;
    let total = by_type.iter().map(|c| c.count).sum();
    Ok(Json(ActivityStats { total, by_type }))
}

fn start_of_day(date: Date) -> Timestamp {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn end_of_day(date: Date) -> Timestamp {
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    Utc.from_utc_datetime(&end)
}
