//! Middleware for handling request body size limits with JSON error responses.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::error::codes;

/// Error response format for payload too large errors.
#[derive(Serialize)]
struct PayloadTooLargeResponse {
    data: Option<()>,
    error: PayloadTooLargeDetail,
}

#[derive(Serialize)]
struct PayloadTooLargeDetail {
    code: &'static str,
    message: String,
}

/// Middleware that converts 413 Payload Too Large responses to JSON format.
///
/// This middleware should be applied after `RequestBodyLimitLayer` to catch
/// the 413 responses it generates and convert them to the API's JSON error format.
pub async fn json_payload_error(request: Request<Body>, next: Next) -> Response<Body> {
    let response = next.run(request).await;

    // Check if this is a 413 Payload Too Large response
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        // Return a JSON-formatted error response
        let json_response = PayloadTooLargeResponse {
            data: None,
            error: PayloadTooLargeDetail {
                code: codes::PAYLOAD_TOO_LARGE,
                message: "Request body exceeds maximum allowed size".to_string(),
            },
        };

        return (StatusCode::PAYLOAD_TOO_LARGE, Json(json_response)).into_response();
    }

    response
}
