use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, instrument};

use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    models::{
        common::FieldViolation,
        story::{StoryRequest, StoryResponse},
    },
};

/// POST /api/story/generate
#[instrument(skip(state, payload))]
pub async fn generate_story(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StoryRequest>, JsonRejection>,
) -> Result<Json<StoryResponse>> {
    // Malformed JSON is a validation failure too, never a provider call
    let Json(request) = payload.map_err(|rejection| {
        ApiError::Validation(vec![FieldViolation::new(
            "body",
            "invalid_json",
            rejection.body_text(),
        )])
    })?;

    let config = request.into_config().map_err(ApiError::Validation)?;

    info!(
        age_range = config.age_range.as_str(),
        theme = config.theme.as_str(),
        story_length = config.story_length.as_str(),
        "Generating story for {}",
        config.character_name
    );

    let story = state.story_service.generate_story(&config).await?;

    Ok(Json(story))
}
