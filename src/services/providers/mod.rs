//! Generative provider seams.
//!
//! The story pipeline only sees [`TextProvider`] and [`ImageProvider`]; the
//! concrete vendor clients are chosen from configuration once at startup.

pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::{
    config::{ImageBackend, ProviderConfig, TextBackend},
    error::Result,
};

pub use gemini::{GeminiImageProvider, GeminiTextProvider};
pub use openai::{OpenAIImageProvider, OpenAITextProvider};

/// Prompt in, free text out
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short backend name, used for the `<name>Configured` health flag
    fn name(&self) -> &'static str;

    /// Whether a credential is present; says nothing about reachability
    fn is_configured(&self) -> bool;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Prompt in, one image URL out (`data:` URI or hosted URL)
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Inline base64 image bytes as a `data:` URI
pub fn data_url(mime_type: Option<&str>, base64_data: &str) -> String {
    let mime = mime_type
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME);
    format!("data:{};base64,{}", mime, base64_data)
}

pub fn build_http_client(config: &ProviderConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// Build the configured text and image providers over one shared HTTP client
pub fn build_providers(
    config: &ProviderConfig,
) -> anyhow::Result<(Arc<dyn TextProvider>, Arc<dyn ImageProvider>)> {
    let http = build_http_client(config)?;

    let text: Arc<dyn TextProvider> = match config.text_backend {
        TextBackend::Gemini => Arc::new(GeminiTextProvider::new(http.clone(), &config.gemini)),
        TextBackend::OpenAI => Arc::new(OpenAITextProvider::new(http.clone(), &config.openai)),
    };

    let image: Arc<dyn ImageProvider> = match config.image_backend {
        ImageBackend::Gemini => Arc::new(GeminiImageProvider::flash_image(
            http.clone(),
            &config.gemini,
        )),
        ImageBackend::Imagen => Arc::new(GeminiImageProvider::imagen(http.clone(), &config.gemini)),
        ImageBackend::OpenAI => Arc::new(OpenAIImageProvider::new(http, &config.openai)),
    };

    tracing::info!(
        "Story providers ready: text={} (configured: {}), image={}",
        text.name(),
        text.is_configured(),
        image.name()
    );

    Ok((text, image))
}
