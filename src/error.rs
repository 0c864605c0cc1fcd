//! Application error types and HTTP response conversion.
//!
//! This module defines the error types used throughout the API
//! and implements conversion to HTTP responses with consistent JSON format.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error codes matching the API specification.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
}

/// Error detail in API response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Application errors that can be returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request body failed field-level validation (400).
    ValidationError(String),
    /// Request is structurally malformed (400).
    BadRequest(String),
    /// Missing or invalid bearer token (401).
    Unauthorized(String),
    /// Caller's role or relationship to the resource forbids the action (403).
    Forbidden(String),
    /// Resource not found (404).
    NotFound(String),
    /// Request conflicts with the resource's current state (409).
    Conflict(String),
    /// Caller exceeded the in-memory creation quota (429), with an optional
    /// `Retry-After` duration in seconds.
    RateLimited(String, Option<u64>),
    /// Internal server error (500).
    ServerError(String),
}

impl AppError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Forbidden(_) => codes::FORBIDDEN,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Conflict(_) => codes::CONFLICT,
            AppError::RateLimited(..) => codes::RATE_LIMITED,
            AppError::ServerError(_) => codes::SERVER_ERROR,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited(..) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::RateLimited(msg, _)
            | AppError::ServerError(msg) => msg,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(message.into())
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    /// Create a rate limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        AppError::RateLimited(message.into(), None)
    }

    /// Create a rate limited error carrying a `Retry-After` duration in seconds.
    pub fn rate_limited_after(message: impl Into<String>, retry_after_secs: u64) -> Self {
        AppError::RateLimited(message.into(), Some(retry_after_secs))
    }

    /// Create a server error.
    pub fn server_error(message: impl Into<String>) -> Self {
        AppError::ServerError(message.into())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// Error response format matching the API specification.
#[derive(Serialize)]
struct ErrorResponse {
    data: Option<()>,
    error: ErrorDetail,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let unauthorized = matches!(self, AppError::Unauthorized(_));
        let error_response = ErrorResponse {
            data: None,
            error: ErrorDetail {
                code: self.code(),
                message: self.message().to_string(),
            },
        };

        let retry_after = match &self {
            AppError::RateLimited(_, Some(secs)) => Some(*secs),
            _ => None,
        };

        let mut response = (self.status_code(), Json(error_response)).into_response();
        if unauthorized {
            response
                .headers_mut()
                .insert("WWW-Authenticate", HeaderValue::from_static("Bearer"));
        }
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert("Retry-After", value);
            }
        }
        response
    }
}

/// Convert from sqlx errors to AppError.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        match err {
            sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
            _ => AppError::server_error("Database error"),
        }
    }
}

/// Convert from JWT decode errors to AppError.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("Token decode error: {:?}", err);
        AppError::unauthorized("Invalid or expired token")
    }
}

/// Convert from storage errors to AppError.
impl From<crate::storage::StorageError> for AppError {
    fn from(err: crate::storage::StorageError) -> Self {
        tracing::error!("Storage error: {:?}", err);
        match err {
            crate::storage::StorageError::NotFound(_) => AppError::not_found("Photo not found"),
            _ => AppError::server_error("Storage error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct TestErrorDetail {
        code: String,
        message: String,
    }

    #[derive(Deserialize)]
    struct TestErrorResponse {
        data: Option<()>,
        error: TestErrorDetail,
    }

    async fn extract_error_response(response: Response) -> (StatusCode, TestErrorResponse) {
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: TestErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, parsed)
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let err = AppError::validation("Title must be between 5 and 200 characters");
        let response = err.into_response();
        let (status, body) = extract_error_response(response).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.data.is_none());
        assert_eq!(body.error.code, codes::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_error_response() {
        let err = AppError::not_found("Ticket not found");
        let response = err.into_response();
        let (status, body) = extract_error_response(response).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, codes::NOT_FOUND);
        assert_eq!(body.error.message, "Ticket not found");
    }

    #[tokio::test]
    async fn test_unauthorized_error_response_sets_www_authenticate() {
        let err = AppError::unauthorized("Missing bearer token");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("WWW-Authenticate").unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_forbidden_error_response() {
        let err = AppError::forbidden("Only the assigned team can change this status");
        let response = err.into_response();
        let (status, body) = extract_error_response(response).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.error.code, codes::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_conflict_error_response() {
        let err = AppError::conflict("An escalation is already pending for this ticket");
        let response = err.into_response();
        let (status, body) = extract_error_response(response).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, codes::CONFLICT);
    }

    #[tokio::test]
    async fn test_rate_limited_error_response() {
        let err = AppError::rate_limited("Too many tickets created from this address");
        let response = err.into_response();
        let (status, body) = extract_error_response(response).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body.error.code, codes::RATE_LIMITED);
    }

    #[tokio::test]
    async fn test_rate_limited_error_carries_retry_after_header() {
        let err = AppError::rate_limited_after("Too many requests", 30);
        let response = err.into_response();
        assert_eq!(
            response.headers().get("Retry-After").unwrap(),
            "30"
        );
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let err = AppError::server_error("Internal server error");
        let response = err.into_response();
        let (status, body) = extract_error_response(response).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, codes::SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::validation("Test message");
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] Test message");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::validation("").code(), codes::VALIDATION_ERROR);
        assert_eq!(AppError::bad_request("").code(), codes::BAD_REQUEST);
        assert_eq!(AppError::unauthorized("").code(), codes::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("").code(), codes::FORBIDDEN);
        assert_eq!(AppError::not_found("").code(), codes::NOT_FOUND);
        assert_eq!(AppError::conflict("").code(), codes::CONFLICT);
        assert_eq!(AppError::rate_limited("").code(), codes::RATE_LIMITED);
        assert_eq!(AppError::server_error("").code(), codes::SERVER_ERROR);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::unauthorized("").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::rate_limited("").status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::server_error("").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
