use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::ReportKind;
use crate::schedule::ExportFormat;
use crate::server::types::ApiErrorType;
use crate::server::util::{attachment_response, BearerToken};
use crate::types::ConsoleState;

/// GET /reports/:kind
/// Passes through a server-generated CSV report as a download
pub async fn get_report(
    Path(kind): Path<String>,
    State(s): State<Arc<ConsoleState>>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    info!("GET /reports/{}", kind);

    let Some(report) = ReportKind::from_segment(&kind) else {
        return ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "Unknown report",
            Some(format!(
                "Expected 'courses', 'availability-gaps' or 'workload', got '{}'",
                kind
            )),
        ))
        .into_response();
    };

    match s.client.download_report(token.as_str(), report).await {
        Ok(bytes) => attachment_response(bytes, ExportFormat::Csv.content_type(), &report.filename()),
        Err(e) => {
            error!("Failed to download {} report: {}", kind, e);
            ApiErrorType::from(e).into_response()
        }
    }
}
