use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::ApiError;
use crate::schedule::ExportError;

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiErrorType {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, details): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            details,
        }
    }
}

impl From<ApiError> for ApiErrorType {
    fn from(err: ApiError) -> Self {
        let (status, message) = match &err {
            ApiError::Unauthorized { .. } => {
                (StatusCode::UNAUTHORIZED, "Session expired - please sign in again")
            }
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "Resource not found"),
            ApiError::Network { .. } => (StatusCode::BAD_GATEWAY, "Scheduler service unreachable"),
            ApiError::Decode { .. } | ApiError::UnexpectedResponse { .. } => (
                StatusCode::BAD_GATEWAY,
                "Unexpected response from scheduler service",
            ),
            ApiError::UrlError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Scheduler service URL is misconfigured",
            ),
        };
        Self::from((status, message, Some(err.to_string())))
    }
}

impl From<ExportError> for ApiErrorType {
    fn from(err: ExportError) -> Self {
        Self::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to build export",
            Some(err.to_string()),
        ))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
