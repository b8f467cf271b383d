use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{middleware as mw, Router};

use crate::server::endpoints::{preferences, reports, status, timeslots, timetable};
use crate::types::ConsoleState;

mod endpoints;
mod middleware;
mod types;
mod util;

pub use types::ApiErrorType;
pub use util::BearerToken;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The shared service state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<ConsoleState>) -> Router {
    // Router whose endpoints forward the caller's bearer token
    let authed_router = Router::new()
        .route("/timetable/:view", get(timetable::get_timetable))
        .route(
            "/timetable/:view/export",
            get(timetable::get_timetable_export),
        )
        .route("/timeslots/catalog", get(timeslots::get_catalog))
        .route("/timeslots/weekly", get(timeslots::get_weekly))
        .route("/timeslots/validate", post(timeslots::post_validate))
        .route("/preferences", get(preferences::get_preferences))
        .route("/preferences/validate", post(preferences::post_validate))
        .route(
            "/preferences/:instructor_id",
            post(preferences::post_add_preference),
        )
        .route(
            "/preferences/:instructor_id/:preference_id",
            delete(preferences::delete_preference),
        )
        .route("/reports/:kind", get(reports::get_report))
        .layer(mw::from_fn(middleware::check_bearer));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(authed_router)
        .with_state(app_state)
}
