use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::{error::ApiError, models::common::FieldViolation};

/// Bodies past this are rejected as a `body` validation failure
const MAX_REQUEST_BODY: usize = 1024 * 1024;
const MAX_LOGGED_BODY: usize = 2000;

/// Middleware that logs request bodies and response status/latency.
///
/// Response bodies are not buffered: a generated story inlines its
/// illustrations as data URIs and can run to several megabytes.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_REQUEST_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to read request body: {}", e);
            return ApiError::Validation(vec![FieldViolation::new(
                "body",
                "unreadable_body",
                format!("Request body could not be read (limit {} bytes)", MAX_REQUEST_BODY),
            )])
            .into_response();
        }
    };

    let request_body = String::from_utf8_lossy(&bytes);
    let truncated_request = truncate_body(&request_body, MAX_LOGGED_BODY);

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        body = %truncated_request,
        "→ Request"
    );

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let content_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        latency_ms = %start.elapsed().as_millis(),
        bytes = %content_length,
        "← Response"
    );

    response
}

/// Truncate body for logging, adding ellipsis if truncated
fn truncate_body(body: &str, max_len: usize) -> String {
    let body = body.trim();
    if body.len() <= max_len {
        return body.to_string();
    }

    let mut cut = max_len;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...[truncated, {} bytes total]", &body[..cut], body.len())
}
