use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::schedule::{build_catalog, check_time_slot, weekly_view, TimeSlot};
use crate::server::types::ApiErrorType;
use crate::server::util::BearerToken;
use crate::types::ConsoleState;

/// Body of `POST /timeslots/validate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCandidate {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub editing_id: Option<i64>,
}

/// GET /timeslots/catalog
/// Returns the ordered, deduplicated slot labels
pub async fn get_catalog(
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    info!("GET /timeslots/catalog");

    match s.client.fetch_time_slots(token.as_str()).await {
        Ok(slots) => (StatusCode::OK, Json(build_catalog(&slots))).into_response(),
        Err(e) => {
            error!("Failed to fetch time slots: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /timeslots/weekly
/// Returns every day's slots sorted by start time
pub async fn get_weekly(
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    info!("GET /timeslots/weekly");

    match s.client.fetch_time_slots(token.as_str()).await {
        Ok(slots) => (StatusCode::OK, Json(weekly_view(&slots))).into_response(),
        Err(e) => {
            error!("Failed to fetch time slots: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /timeslots/validate
/// Checks a slot's fields and looks for overlaps with existing slots
pub async fn post_validate(
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
    Json(body): Json<SlotCandidate>,
) -> Response {
    info!("POST /timeslots/validate");

    let existing = match s.client.fetch_time_slots(token.as_str()).await {
        Ok(slots) => slots,
        Err(e) => {
            error!("Failed to fetch time slots: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    let candidate = TimeSlot::new(&body.day, &body.start_time, &body.end_time);
    let validation = check_time_slot(&candidate, &existing, body.editing_id);
    (StatusCode::OK, Json(validation)).into_response()
}
