use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::app::AppState;
use crate::error::ApiError;

/// Reject any request that does not carry the configured bearer key.
///
/// Runs ahead of every route and the fallback, so nothing past this point
/// touches the database for an unauthenticated caller.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.api_key.authorizes(request.headers()) {
        warn!("Rejected {} {}: missing or invalid API key", request.method(), request.uri().path());
        return ApiError::forbidden().into_response();
    }

    next.run(request).await
}
