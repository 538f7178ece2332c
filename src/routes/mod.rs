// Route modules
pub mod health;
pub mod story;

use crate::{app_state::AppState, middleware::logging_middleware};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api/story", story_routes())
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Story routes, mounted under /api/story
fn story_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(story::generate_story))
        .route("/health", get(health::story_health))
}
