use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::common::FieldViolation;

pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate story. Please try again.";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse story response";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request data")]
    Validation(Vec<FieldViolation>),

    #[error("AI provider error: {0}")]
    AIProvider(String),

    #[error("No response from {0}")]
    EmptyReply(&'static str),

    #[error("Failed to parse story response")]
    MalformedReply(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self {
            ApiError::Validation(details) => {
                tracing::debug!("Rejected story request: {} violation(s)", details.len());
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Invalid request data",
                        "details": details,
                    })),
                )
                    .into_response();
            }
            ApiError::AIProvider(ref msg) => {
                tracing::error!("AI provider error: {}", msg);
                GENERIC_FAILURE_MESSAGE
            }
            ApiError::EmptyReply(provider) => {
                tracing::error!("No response from {}", provider);
                GENERIC_FAILURE_MESSAGE
            }
            ApiError::MalformedReply(ref raw) => {
                tracing::error!("Failed to parse provider reply: {}", raw);
                PARSE_FAILURE_MESSAGE
            }
            ApiError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                "Internal server error"
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": body })),
        )
            .into_response()
    }
}

// Helper type for results
pub type Result<T> = std::result::Result<T, ApiError>;
