//! Error handler for converting AppError to HTTP responses.
//!
//! Implements `IntoResponse` for `AppError` so every handler and extractor
//! shares one JSON error shape, and wraps axum's own plain-text error
//! responses (unknown routes, wrong methods) in that same shape.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 409 DUPLICATE_ENTRY
    /// - Validation → 400 VALIDATION_ERROR
    /// - BadRequest → 400 BAD_REQUEST
    /// - Unauthorized → 401 UNAUTHORIZED
    /// - Forbidden → 403 FORBIDDEN
    /// - Database → 500 DATABASE_ERROR
    /// - Configuration → 500 CONFIGURATION_ERROR
    /// - ConnectionPool → 503 SERVICE_UNAVAILABLE
    /// - Internal → 500 INTERNAL_ERROR
    ///
    /// Sources of 5xx errors are logged, never sent to the client.
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::Unauthorized { message } => ErrorResponse::new("UNAUTHORIZED", message),
            AppError::Forbidden { message } => ErrorResponse::new("FORBIDDEN", message),
            AppError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = ?source, "Database error");
                ErrorResponse::new(
                    "DATABASE_ERROR",
                    &format!("Database operation failed: {}", operation),
                )
                .with_details(json!({ "operation": operation }))
            }
            AppError::Configuration { key, source } => {
                tracing::error!(key = %key, error = ?source, "Configuration error");
                ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
            }
            AppError::ConnectionPool { source } => {
                tracing::error!(error = ?source, "Connection pool error");
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Rewrites error responses that are not already JSON into `ErrorResponse`.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (code, fallback) = match status {
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
    };

    let (mut parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, 64 * 1024).await.unwrap_or_default();
    let original = String::from_utf8_lossy(&body_bytes).trim().to_string();

    // Server error bodies may carry internals.
    let message = if original.is_empty() || status.is_server_error() {
        fallback.to_string()
    } else {
        original
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);

    let mut rewritten = (status, Json(ErrorResponse::new(code, &message))).into_response();
    for (name, value) in parts.headers.iter() {
        rewritten.headers_mut().insert(name.clone(), value.clone());
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http, middleware, routing::get};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::user_not_found("ghost"), StatusCode::NOT_FOUND),
            (
                AppError::Duplicate {
                    entity: "user".into(),
                    field: "email".into(),
                    value: "a@b.io".into(),
                },
                StatusCode::CONFLICT,
            ),
            (AppError::bad_request("x"), StatusCode::BAD_REQUEST),
            (
                AppError::Unauthorized { message: "x".into() },
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::Forbidden { message: "x".into() }, StatusCode::FORBIDDEN),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("down"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error_to_status_code(&error), expected);
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = AppError::user_not_found("ghost").into_response();
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "no user with username");
    }

    #[tokio::test]
    async fn test_internal_error_hides_source() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        }
        .into_response();
        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_global_handler_wraps_unknown_route() {
        let app = Router::new()
            .route("/known", get(|| async { "ok" }))
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .oneshot(http::Request::builder().uri("/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_global_handler_wraps_wrong_method() {
        let app = Router::new()
            .route("/known", get(|| async { "ok" }))
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .oneshot(
                http::Request::builder()
                    .method(http::Method::PATCH)
                    .uri("/known")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
        assert_eq!(body_json(response).await["code"], "METHOD_NOT_ALLOWED");
    }
}
