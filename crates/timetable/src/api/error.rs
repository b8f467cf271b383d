//! Error types for calls to the scheduler API.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the scheduler API.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// The bearer token was rejected
    #[error("Unauthorized ({status})")]
    Unauthorized { status: u16 },

    /// The requested resource does not exist
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Server returned an unexpected response
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },
}

impl ApiError {
    /// Classifies a non-success status returned for `path`.
    pub fn from_status(status: StatusCode, path: &str, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                status: status.as_u16(),
            },
            StatusCode::NOT_FOUND => ApiError::NotFound {
                path: path.to_string(),
            },
            _ => ApiError::UnexpectedResponse {
                status: status.as_u16(),
                message: body,
            },
        }
    }

    /// Returns true if the caller must sign in again.
    pub fn needs_reauth(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network { .. } => true,
            ApiError::UnexpectedResponse { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode {
                message: err.to_string(),
            }
        } else {
            ApiError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::UrlError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "timeslots", String::new())
            .needs_reauth());
        assert!(ApiError::from_status(StatusCode::FORBIDDEN, "timeslots", String::new())
            .needs_reauth());
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "timeslots", String::new()),
            ApiError::NotFound { .. }
        ));

        let server = ApiError::from_status(StatusCode::BAD_GATEWAY, "timeslots", "down".into());
        assert!(server.is_retryable());
        let client = ApiError::from_status(StatusCode::BAD_REQUEST, "timeslots", "bad".into());
        assert!(!client.is_retryable());
    }
}
