use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    config::ImagePolicy,
    error::Result,
    models::story::{StoryConfig, StoryResponse},
    services::{
        assembler::{assemble_response, illustrate, IllustratedPage, ImageOutcome},
        prompt_builder::{build_cover_prompt, build_story_prompt, enhance_image_prompt},
        providers::{ImageProvider, TextProvider},
        story_parser::{parse_story_reply, ParsedPage},
    },
};

/// Runs one story generation: prompt, text call, parse, illustrations
pub struct StoryService {
    text_provider: Arc<dyn TextProvider>,
    image_provider: Arc<dyn ImageProvider>,
    image_policy: ImagePolicy,
}

impl StoryService {
    pub fn new(
        text_provider: Arc<dyn TextProvider>,
        image_provider: Arc<dyn ImageProvider>,
        image_policy: ImagePolicy,
    ) -> Self {
        Self {
            text_provider,
            image_provider,
            image_policy,
        }
    }

    pub fn text_provider_name(&self) -> &'static str {
        self.text_provider.name()
    }

    pub fn text_provider_configured(&self) -> bool {
        self.text_provider.is_configured()
    }

    pub fn image_policy(&self) -> ImagePolicy {
        self.image_policy
    }

    /// Generate and assemble the full response body
    pub async fn generate_story(&self, config: &StoryConfig) -> Result<StoryResponse> {
        let pages = self.generate_pages(config).await?;
        Ok(assemble_response(config, pages))
    }

    /// Generate pages with per-page image outcomes still visible
    #[instrument(skip(self, config), fields(
        theme = config.theme.as_str(),
        length = config.story_length.as_str(),
        policy = ?self.image_policy
    ))]
    pub async fn generate_pages(&self, config: &StoryConfig) -> Result<Vec<IllustratedPage>> {
        let prompt = build_story_prompt(config);
        let reply = self.text_provider.complete(&prompt).await?;
        let pages = parse_story_reply(&reply)?;

        if pages.len() != config.page_count() {
            warn!(
                "Provider wrote {} pages, {} were requested",
                pages.len(),
                config.page_count()
            );
        }

        let outcomes = match self.image_policy {
            ImagePolicy::PerPage => self.illustrate_every_page(config, &pages).await,
            ImagePolicy::CoverOnly => self.illustrate_cover(config, pages.len()).await,
        };

        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, ImageOutcome::Failed(_)))
            .count();
        info!(
            "Story generated: {} pages, {} image failures",
            pages.len(),
            failed
        );

        Ok(illustrate(pages, outcomes))
    }

    async fn illustrate_every_page(
        &self,
        config: &StoryConfig,
        pages: &[ParsedPage],
    ) -> Vec<ImageOutcome> {
        let requests = pages.iter().enumerate().map(|(index, page)| {
            let scene = if page.image_prompt.trim().is_empty() {
                page.text.as_str()
            } else {
                page.image_prompt.as_str()
            };
            let prompt = enhance_image_prompt(scene, &config.character_name, config.theme.as_str());
            async move { self.request_image(index, &prompt).await }
        });

        join_all(requests).await
    }

    async fn illustrate_cover(&self, config: &StoryConfig, page_count: usize) -> Vec<ImageOutcome> {
        if page_count == 0 {
            return Vec::new();
        }

        let cover = self.request_image(0, &build_cover_prompt(config)).await;
        std::iter::once(cover)
            .chain(std::iter::repeat(ImageOutcome::Skipped).take(page_count - 1))
            .collect()
    }

    async fn request_image(&self, index: usize, prompt: &str) -> ImageOutcome {
        match self.image_provider.generate_image(prompt).await {
            Ok(url) => ImageOutcome::Generated(url),
            Err(e) => {
                warn!("Failed to generate image for page {}: {}", index + 1, e);
                ImageOutcome::Failed(e.to_string())
            }
        }
    }
}
