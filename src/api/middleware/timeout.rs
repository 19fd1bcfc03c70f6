//! Per-request deadline taken from `server.request_timeout`.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::state::AppState;

/// Answers 408 when the inner service has not responded within the deadline.
///
/// The handler future is dropped at that point; a transaction in flight is
/// rolled back when its connection returns to the pool.
pub async fn request_timeout_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match tokio::time::timeout(state.request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                %method,
                %path,
                timeout_secs = state.request_timeout.as_secs(),
                "Request timed out"
            );
            (
                StatusCode::REQUEST_TIMEOUT,
                Json(ErrorResponse::new("REQUEST_TIMEOUT", "Request timed out")),
            )
                .into_response()
        }
    }
}
