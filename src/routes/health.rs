use axum::{extract::State, Json};

use crate::{
    app_state::AppState,
    models::common::{HealthResponse, ServiceHealthResponse},
};

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Story Generator API is running",
    })
}

/// GET /api/story/health
///
/// Reports whether a text-provider credential is present; the provider is
/// never contacted.
pub async fn story_health(State(state): State<AppState>) -> Json<ServiceHealthResponse> {
    let service = &state.story_service;
    Json(ServiceHealthResponse::new(
        service.text_provider_name(),
        service.text_provider_configured(),
    ))
}
