use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::ApiError;
use crate::schedule::{
    build_timetable, export_filename, export_grid, ExportFormat, Grid, TimetableView,
};
use crate::server::types::ApiErrorType;
use crate::server::util::{attachment_response, BearerToken};
use crate::types::ConsoleState;

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: ExportFormat,
}

fn parse_view(view: &str) -> Result<TimetableView, ApiErrorType> {
    TimetableView::from_segment(view).ok_or_else(|| {
        ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "Unknown timetable view",
            Some(format!("Expected 'student' or 'instructor', got '{}'", view)),
        ))
    })
}

/// Fetches the catalog and the schedule concurrently and projects the grid.
async fn load_grid(
    state: &ConsoleState,
    token: &str,
    view: TimetableView,
) -> Result<Grid, ApiError> {
    let (slots, schedule) = tokio::join!(
        state.client.fetch_time_slots(token),
        state.client.fetch_timetable(token, view)
    );
    Ok(build_timetable(&slots?, &schedule?))
}

/// GET /timetable/:view
/// Returns the projected weekly grid for the student or instructor view
pub async fn get_timetable(
    Path(view): Path<String>,
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    info!("GET /timetable/{}", view);

    let view = match parse_view(&view) {
        Ok(v) => v,
        Err(e) => return e.into_response(),
    };

    match load_grid(&s, token.as_str(), view).await {
        Ok(grid) => (StatusCode::OK, Json(grid)).into_response(),
        Err(e) => {
            error!("Failed to load timetable: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /timetable/:view/export?format=csv|xlsx
/// Downloads the projected grid as a file
pub async fn get_timetable_export(
    Path(view): Path<String>,
    Query(params): Query<ExportParams>,
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    info!("GET /timetable/{}/export (format={:?})", view, params.format);

    let view = match parse_view(&view) {
        Ok(v) => v,
        Err(e) => return e.into_response(),
    };

    let grid = match load_grid(&s, token.as_str(), view).await {
        Ok(grid) => grid,
        Err(e) => {
            error!("Failed to load timetable for export: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    match export_grid(&grid, params.format) {
        Ok(bytes) => {
            let today = chrono::Local::now().date_naive();
            let filename = export_filename(view, params.format, today);
            attachment_response(bytes, params.format.content_type(), &filename)
        }
        Err(e) => {
            error!("Failed to export timetable: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}
