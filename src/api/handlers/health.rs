//! Liveness endpoint.

use axum::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{HealthResponse, HealthStatus};
use crate::state::AppState;

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

/// Reports that the process is up and serving requests.
///
/// Does not touch the database.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
    })
}
