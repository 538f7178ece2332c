use crate::{
    config::Config,
    services::{providers::build_providers, StoryService},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub story_service: Arc<StoryService>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        // Providers are built once and shared by every request
        let (text_provider, image_provider) = build_providers(&config.provider)?;
        let story_service = StoryService::new(
            text_provider,
            image_provider,
            config.story.image_policy,
        );

        Ok(Self::from_service(Arc::new(story_service)))
    }

    /// Wrap an already-built service, e.g. one over stub providers
    pub fn from_service(story_service: Arc<StoryService>) -> Self {
        Self { story_service }
    }
}
