use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{data_url, ImageProvider, TextProvider};
use crate::{
    config::OpenAIConfig,
    error::{ApiError, Result},
    services::prompt_builder::STORY_SYSTEM_PROMPT,
};

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAIImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
    quality: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIImageResponse {
    #[serde(default)]
    data: Vec<OpenAIImageData>,
}

#[derive(Debug, Deserialize)]
struct OpenAIImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

impl OpenAIResponse {
    fn reply_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

impl OpenAIImageResponse {
    /// Hosted URL when present, otherwise inline base64 as a data URI
    fn image_url(self) -> Option<String> {
        let first = self.data.into_iter().next()?;
        match (first.url, first.b64_json) {
            (Some(url), _) if !url.is_empty() => Some(url),
            (_, Some(b64)) if !b64.is_empty() => Some(data_url(None, &b64)),
            _ => None,
        }
    }
}

async fn send_json<Req, Resp>(
    http: &reqwest::Client,
    url: String,
    api_key: Option<&String>,
    body: &Req,
) -> Result<Resp>
where
    Req: Serialize,
    Resp: for<'de> Deserialize<'de>,
{
    let api_key =
        api_key.ok_or_else(|| ApiError::AIProvider("OpenAI API key not configured".to_string()))?;

    let response = http
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(body)
        .send()
        .await
        .map_err(|e| ApiError::AIProvider(format!("OpenAI request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(ApiError::AIProvider(format!(
            "OpenAI error {}: {}",
            status.as_u16(),
            error_text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::AIProvider(format!("Failed to parse OpenAI response: {}", e)))
}

pub struct OpenAITextProvider {
    config: OpenAIConfig,
    http_client: reqwest::Client,
}

impl OpenAITextProvider {
    pub fn new(http_client: reqwest::Client, config: &OpenAIConfig) -> Self {
        Self {
            config: config.clone(),
            http_client,
        }
    }
}

#[async_trait]
impl TextProvider for OpenAITextProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    #[instrument(skip(self, prompt))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.config.text_model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: STORY_SYSTEM_PROMPT.to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response: OpenAIResponse = send_json(
            &self.http_client,
            format!("{}/chat/completions", self.config.api_base.trim_end_matches('/')),
            self.config.api_key.as_ref(),
            &request,
        )
        .await?;

        let text = response.reply_text().ok_or(ApiError::EmptyReply("OpenAI"))?;
        info!("OpenAI returned {} chars", text.len());
        Ok(text)
    }
}

pub struct OpenAIImageProvider {
    config: OpenAIConfig,
    http_client: reqwest::Client,
}

impl OpenAIImageProvider {
    pub fn new(http_client: reqwest::Client, config: &OpenAIConfig) -> Self {
        Self {
            config: config.clone(),
            http_client,
        }
    }
}

#[async_trait]
impl ImageProvider for OpenAIImageProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, prompt))]
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = OpenAIImageRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.config.image_size.clone(),
            quality: self.config.image_quality.clone(),
        };

        info!(
            "Generating image: size={}, quality={}, prompt_len={}",
            request.size,
            request.quality,
            prompt.len()
        );

        let response: OpenAIImageResponse = send_json(
            &self.http_client,
            format!(
                "{}/images/generations",
                self.config.api_base.trim_end_matches('/')
            ),
            self.config.api_key.as_ref(),
            &request,
        )
        .await?;

        response
            .image_url()
            .ok_or_else(|| ApiError::AIProvider("No image generated".to_string()))
    }
}
