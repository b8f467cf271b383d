use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::server::types::ApiErrorType;
use crate::server::util::{bearer_token, BearerToken};

/// Rejects requests without a bearer token and hands the token to handlers.
pub async fn check_bearer(mut req: Request, next: Next) -> Response {
    match bearer_token(req.headers()) {
        Some(token) => {
            req.extensions_mut().insert(BearerToken(token));
            next.run(req).await
        }
        None => {
            warn!(path = %req.uri().path(), "Rejecting request without bearer token");
            ApiErrorType::from((
                StatusCode::UNAUTHORIZED,
                "Missing bearer token",
                Some("Send an Authorization: Bearer <token> header".to_string()),
            ))
            .into_response()
        }
    }
}
