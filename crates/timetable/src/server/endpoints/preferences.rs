//! Endpoints for instructor time-slot preferences.
//!
//! Candidates are checked against the target instructor's current
//! preferences and a fresh time-slot catalog before anything is sent to
//! the scheduler. Without a target instructor the caller's own
//! preferences are used.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::ApiError;
use crate::schedule::{group_by_day, validate_preference_candidate, PreferenceCheck};
use crate::server::types::ApiErrorType;
use crate::server::util::BearerToken;
use crate::types::ConsoleState;

/// Body naming a candidate time slot. The id may arrive as a number or a string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceCandidate {
    #[serde(default)]
    pub timeslot_id: Value,
    /// Instructor whose preferences the candidate is checked against
    #[serde(default)]
    pub instructor_id: Option<i64>,
}

impl PreferenceCandidate {
    fn id_string(&self) -> String {
        match &self.timeslot_id {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// Fetches preferences and time slots concurrently and checks the candidate.
/// With no `instructor_id` the caller's own preferences are used.
async fn check_candidate(
    state: &ConsoleState,
    token: &str,
    candidate_id: &str,
    instructor_id: Option<i64>,
) -> Result<PreferenceCheck, ApiError> {
    let preferences = async {
        match instructor_id {
            Some(id) => state.client.fetch_instructor_preferences(token, id).await,
            None => state.client.fetch_my_preferences(token).await,
        }
    };
    let (preferences, slots) = tokio::join!(preferences, state.client.fetch_time_slots(token));
    Ok(validate_preference_candidate(candidate_id, &preferences?, &slots?))
}

/// GET /preferences
/// Returns the caller's preferences grouped by day
pub async fn get_preferences(
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    info!("GET /preferences");

    match s.client.fetch_my_preferences(token.as_str()).await {
        Ok(preferences) => (StatusCode::OK, Json(group_by_day(&preferences))).into_response(),
        Err(e) => {
            error!("Failed to fetch preferences: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /preferences/validate
/// Checks a candidate without submitting it
pub async fn post_validate(
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
    Json(body): Json<PreferenceCandidate>,
) -> Response {
    let candidate_id = body.id_string();
    info!("POST /preferences/validate (timeslot={})", candidate_id);

    match check_candidate(&s, token.as_str(), &candidate_id, body.instructor_id).await {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(e) => {
            error!("Failed to validate preference: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /preferences/:instructor_id
/// Checks a candidate against that instructor's preferences and submits it when accepted
pub async fn post_add_preference(
    Path(instructor_id): Path<i64>,
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
    Json(body): Json<PreferenceCandidate>,
) -> Response {
    let candidate_id = body.id_string();
    info!(
        "POST /preferences/{} (timeslot={})",
        instructor_id, candidate_id
    );

    let check = match check_candidate(&s, token.as_str(), &candidate_id, Some(instructor_id)).await
    {
        Ok(check) => check,
        Err(e) => {
            error!("Failed to validate preference: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    if !check.ok {
        warn!("Rejected preference candidate: {:?}", check.reason);
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(check)).into_response();
    }

    // Accepted candidates always name a catalog id
    let Ok(timeslot_id) = candidate_id.trim().parse::<i64>() else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(check)).into_response();
    };

    match s
        .client
        .add_preference(token.as_str(), instructor_id, timeslot_id)
        .await
    {
        Ok(()) => (StatusCode::CREATED, Json(check)).into_response(),
        Err(e) => {
            error!("Failed to add preference: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// DELETE /preferences/:instructor_id/:preference_id
pub async fn delete_preference(
    Path((instructor_id, preference_id)): Path<(i64, i64)>,
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    info!("DELETE /preferences/{}/{}", instructor_id, preference_id);

    match s
        .client
        .remove_preference(token.as_str(), instructor_id, preference_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to remove preference: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}
