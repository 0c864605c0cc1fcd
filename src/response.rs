//! API response types and helper functions.
//!
//! This module provides the standard API response wrapper that all endpoints use.
//! The format follows the API specification:
//!
//! Success: `{ "data": { ... }, "error": null }`
//! Error: `{ "data": null, "error": { "code": "...", "message": "..." } }`

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::error::{AppError, ErrorDetail};

/// Standard API response wrapper.
///
/// All API endpoints return this format for consistency.
/// The `T` type parameter is the data payload type.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ErrorDetail>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(data: T) -> Self {
        ApiResponse {
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response.
    ///
    /// This is defined separately on `ApiResponse<()>` since error responses
    /// never have data, which makes type inference easier.
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        ApiResponse {
            data: None,
            error: Some(ErrorDetail {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Type alias for handler results that return data on success.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper function to return a successful response with data.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Helper function to return a successful response with HTTP 201 Created.
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Helper function to return an empty success response.
pub fn empty() -> ApiResult<()> {
    Ok(Json(ApiResponse::success(())))
}

/// Helper function to return an empty success response with HTTP 204 No Content.
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Page of results returned by every list endpoint.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Page {
            items,
            total,
            page,
            page_size,
        }
    }
}
