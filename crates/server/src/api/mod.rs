//! REST API layer built on Axum.
//!
//! Exposes `POST /retrieval` behind bearer-key authentication, plus
//! unauthenticated `GET /health` and `GET /metrics`. Includes middleware for
//! request timeouts, body size limits, metrics collection, security headers
//! and request ID tracing.

/// Structured audit logging.
pub mod audit;
/// API error types mapped to HTTP status codes and error codes.
pub mod errors;
/// HTTP request handlers and application state.
pub mod handlers;
/// Prometheus metrics recording.
pub mod metrics;
/// Request and response data transfer objects.
pub mod models;

use axum::error_handling::HandleErrorLayer;
use axum::extract::{DefaultBodyLimit, MatchedPath, State};
use axum::routing::{get, post};
use axum::{middleware, Router};
use errors::ApiError;
use extknowledge_core::config;
use handlers::AppState;
use std::time::{Duration, Instant};
use tower::buffer::BufferLayer;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

/// Extract the key from `Bearer <api-key>`. The scheme is case-insensitive;
/// anything other than exactly two whitespace-separated parts is rejected.
pub fn parse_bearer(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.split_whitespace();
    let scheme = parts.next()?;
    let key = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(key)
}

/// Constant-time membership check over every configured key.
fn key_matches(keys: &[String], token: &str) -> bool {
    use subtle::ConstantTimeEq;
    keys.iter().fold(false, |found, key| {
        found | bool::from(key.as_bytes().ct_eq(token.as_bytes()))
    })
}

async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Result<axum::response::Response, ApiError> {
    let client_ip = audit::extract_client_ip(req.headers());

    let key_prefix = if state.api_keys.is_empty() {
        "anonymous".to_string()
    } else {
        let header = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = parse_bearer(header).ok_or(ApiError::InvalidAuthHeader)?;
        if !key_matches(&state.api_keys, token) {
            tracing::warn!(
                target: "audit",
                actor = %audit::mask_key(token),
                client_ip = %client_ip,
                "Rejected unknown API key"
            );
            return Err(ApiError::AuthorizationFailed);
        }
        audit::mask_key(token)
    };

    req.extensions_mut().insert(audit::AuditContext {
        key_prefix,
        client_ip,
    });
    Ok(next.run(req).await)
}

async fn request_id_middleware(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %request_id);
    async move {
        let mut response = next.run(req).await;
        if let Ok(value) = axum::http::HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(axum::http::HeaderName::from_static("x-request-id"), value);
        }
        response
    }
    .instrument(span)
    .await
}

async fn security_headers_middleware(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        axum::http::HeaderName::from_static("x-content-type-options"),
        axum::http::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        axum::http::HeaderName::from_static("x-frame-options"),
        axum::http::HeaderValue::from_static("DENY"),
    );
    headers.insert(
        axum::http::HeaderName::from_static("referrer-policy"),
        axum::http::HeaderValue::from_static("no-referrer"),
    );
    response
}

/// `path` label for requests that matched no route.
pub const UNMATCHED_PATH_LABEL: &str = "unmatched";

async fn metrics_middleware(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = req.method().to_string();
    // Route template, never the raw URI: one series per route.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH_LABEL.to_string());
    let start = Instant::now();
    let response = next.run(req).await;
    metrics::record_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}

/// Map a failure from the tower stack onto the API error shape.
fn layer_error(err: &tower::BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        tracing::warn!(error = %err, "Request rejected by service limits");
        ApiError::Overloaded
    }
}

/// Build the application router with all middleware layers.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/retrieval", post(handlers::retrieval))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(protected)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(config::MAX_REQUEST_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: tower::BoxError| async move {
                    layer_error(&err)
                }))
                .layer(BufferLayer::new(1024))
                .layer(ConcurrencyLimitLayer::new(config::MAX_CONCURRENT_REQUESTS))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config::REQUEST_TIMEOUT_SECS,
                ))),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer abc")), Some("abc"));
        assert_eq!(parse_bearer(Some("bearer   abc")), Some("abc"));
        assert_eq!(parse_bearer(Some("BEARER abc")), Some("abc"));
    }

    #[test]
    fn test_parse_bearer_rejects_malformed() {
        assert_eq!(parse_bearer(None), None);
        assert_eq!(parse_bearer(Some("")), None);
        assert_eq!(parse_bearer(Some("abc")), None);
        assert_eq!(parse_bearer(Some("Basic abc")), None);
        assert_eq!(parse_bearer(Some("Bearer abc def")), None);
    }

    #[test]
    fn test_layer_error_timeout_and_overload() {
        let timeout: tower::BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let err = layer_error(&timeout);
        assert_eq!(err.status(), axum::http::StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.code(), errors::ERROR_TIMEOUT);

        let closed: tower::BoxError = "buffer closed".into();
        let err = layer_error(&closed);
        assert_eq!(err.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), errors::ERROR_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_layer_error_renders_error_body() {
        let timeout: tower::BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let response = axum::response::IntoResponse::into_response(layer_error(&timeout));
        assert_eq!(response.status(), axum::http::StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error_code"], 408);
        assert!(body["error_msg"].as_str().unwrap().contains("timed out"));
    }

    #[test]
    fn test_key_matches() {
        let keys = vec!["alpha-key".to_string(), "beta-key".to_string()];
        assert!(key_matches(&keys, "beta-key"));
        assert!(!key_matches(&keys, "beta"));
        assert!(!key_matches(&keys, ""));
    }
}
