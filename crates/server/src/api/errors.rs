//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to an HTTP status code and a numeric error
//! code, rendered as `{"error_code": <code>, "error_msg": "message"}`.

use crate::service::RetrievalError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Malformed or missing `Authorization` header.
pub const ERROR_INVALID_AUTH_HEADER: u32 = 1001;
/// Well-formed header carrying an unknown key.
pub const ERROR_AUTHORIZATION_FAILED: u32 = 1002;
/// Knowledge base does not exist and no default is configured.
pub const ERROR_KNOWLEDGE_NOT_FOUND: u32 = 2001;
/// Request failed validation.
pub const ERROR_BAD_REQUEST: u32 = 400;
/// Engine failure or other unexpected error.
pub const ERROR_INTERNAL: u32 = 500;
/// Request exceeded the server-side timeout.
pub const ERROR_TIMEOUT: u32 = 408;
/// Request shed by the concurrency limit or buffer.
pub const ERROR_UNAVAILABLE: u32 = 503;

/// Application-level error type that implements `IntoResponse`.
///
/// - `InvalidAuthHeader` → 403 / 1001
/// - `AuthorizationFailed` → 403 / 1002
/// - `KnowledgeNotFound` → 404 / 2001
/// - `BadRequest` → 400 / 400
/// - `Internal` → 500 / 500
/// - `Timeout` → 408 / 408
/// - `Overloaded` → 503 / 503
#[derive(Debug)]
pub enum ApiError {
    InvalidAuthHeader,
    AuthorizationFailed,
    KnowledgeNotFound(String),
    BadRequest(String),
    Internal(String),
    Timeout,
    Overloaded,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidAuthHeader | ApiError::AuthorizationFailed => StatusCode::FORBIDDEN,
            ApiError::KnowledgeNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ApiError::InvalidAuthHeader => ERROR_INVALID_AUTH_HEADER,
            ApiError::AuthorizationFailed => ERROR_AUTHORIZATION_FAILED,
            ApiError::KnowledgeNotFound(_) => ERROR_KNOWLEDGE_NOT_FOUND,
            ApiError::BadRequest(_) => ERROR_BAD_REQUEST,
            ApiError::Internal(_) => ERROR_INTERNAL,
            ApiError::Timeout => ERROR_TIMEOUT,
            ApiError::Overloaded => ERROR_UNAVAILABLE,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidAuthHeader => {
                "Invalid Authorization header format. Expected 'Bearer <api-key>' format.".into()
            }
            ApiError::AuthorizationFailed => "Authorization failed".into(),
            ApiError::KnowledgeNotFound(id) => format!("The knowledge does not exist: {id}"),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(msg) => format!("Internal server error: {msg}"),
            ApiError::Timeout => "Request timed out".into(),
            ApiError::Overloaded => "Service is overloaded, retry later".into(),
        }
    }
}

impl From<RetrievalError> for ApiError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::KnowledgeBaseNotFound(id) => ApiError::KnowledgeNotFound(id),
            RetrievalError::Engine(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({
            "error_code": self.code(),
            "error_msg": self.message(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;

    #[test]
    fn test_status_and_codes() {
        let cases = [
            (ApiError::InvalidAuthHeader, StatusCode::FORBIDDEN, 1001),
            (ApiError::AuthorizationFailed, StatusCode::FORBIDDEN, 1002),
            (ApiError::KnowledgeNotFound("kb".into()), StatusCode::NOT_FOUND, 2001),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST, 400),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, 500),
            (ApiError::Timeout, StatusCode::REQUEST_TIMEOUT, 408),
            (ApiError::Overloaded, StatusCode::SERVICE_UNAVAILABLE, 503),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_from_retrieval_error() {
        let not_found: ApiError = RetrievalError::KnowledgeBaseNotFound("AAA".into()).into();
        assert_eq!(not_found.message(), "The knowledge does not exist: AAA");

        let engine: ApiError = RetrievalError::Engine(EngineError::Decode("eof".into())).into();
        assert_eq!(engine.code(), 500);
        assert!(engine.message().starts_with("Internal server error: "));
    }

    #[test]
    fn test_into_response_status() {
        let resp = ApiError::KnowledgeNotFound("kb".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
