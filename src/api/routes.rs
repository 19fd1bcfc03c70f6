//! Router assembly: API routes, OpenAPI document and middleware stack.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{health::health_routes, users::user_routes};
use crate::api::middleware::{
    global_error_handler, logging_middleware, request_id_middleware, request_timeout_middleware,
};
use crate::state::AppState;

/// Builds the application router.
///
/// # Middleware Order
/// Last added runs first:
/// 1. Compression
/// 2. Request ID (generates or propagates `x-request-id`)
/// 3. Logging (sees the request ID)
/// 4. Global error handler (wraps plain-text 404/405 in `ErrorResponse`)
/// 5. Request timeout (`server.request_timeout`, answers 408)
///
/// No CORS layer: it answers every `OPTIONS` itself, and the user routes
/// serve `OPTIONS` with their own `Allow` header.
///
/// # Routes
/// - `/api/users`, `/api/users/{username}`
/// - `/api/health`
/// - `/swagger-ui`, `/api-docs/openapi.json`
pub fn create_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(user_routes())
        .merge(health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_timeout_middleware,
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .with_state(state)
}
