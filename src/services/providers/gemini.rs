use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{data_url, ImageProvider, TextProvider};
use crate::{
    config::GeminiConfig,
    error::{ApiError, Result},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u8,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str, generation_config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        }
    }
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated
    fn reply_text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image across all candidates
    fn first_inline_image(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref())
            .map(|inline| data_url(inline.mime_type.as_deref(), &inline.data))
    }
}

/// Shared plumbing for the Gemini REST surface
#[derive(Clone)]
struct GeminiApi {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl GeminiApi {
    fn new(http: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    async fn post<Req, Resp>(&self, model: &str, method: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: for<'de> Deserialize<'de>,
    {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ApiError::AIProvider("Gemini API key not configured".to_string()))?;

        let response = self
            .http
            .post(format!("{}/models/{}:{}", self.api_base, model, method))
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::AIProvider(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::AIProvider(format!(
                "Gemini error {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::AIProvider(format!("Failed to parse Gemini response: {}", e)))
    }
}

pub struct GeminiTextProvider {
    api: GeminiApi,
    model: String,
}

impl GeminiTextProvider {
    pub fn new(http: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            api: GeminiApi::new(http, config),
            model: config.text_model.clone(),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api.api_key.is_some()
    }

    #[instrument(skip(self, prompt))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::from_prompt(prompt, None);
        let response: GenerateContentResponse = self
            .api
            .post(&self.model, "generateContent", &request)
            .await?;

        let text = response.reply_text().ok_or(ApiError::EmptyReply("Gemini"))?;
        info!("Gemini returned {} chars", text.len());
        Ok(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeminiImageMode {
    /// Image-capable `generateContent` model returning inline parts
    FlashImage,
    /// Imagen `predict` endpoint returning base64 samples
    Imagen,
}

pub struct GeminiImageProvider {
    api: GeminiApi,
    model: String,
    mode: GeminiImageMode,
}

impl GeminiImageProvider {
    pub fn flash_image(http: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            api: GeminiApi::new(http, config),
            model: config.image_model.clone(),
            mode: GeminiImageMode::FlashImage,
        }
    }

    pub fn imagen(http: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            api: GeminiApi::new(http, config),
            model: config.imagen_model.clone(),
            mode: GeminiImageMode::Imagen,
        }
    }

    async fn generate_flash_image(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::from_prompt(
            prompt,
            Some(GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            }),
        );
        let response: GenerateContentResponse = self
            .api
            .post(&self.model, "generateContent", &request)
            .await?;

        response
            .first_inline_image()
            .ok_or_else(|| ApiError::AIProvider("No image generated".to_string()))
    }

    async fn generate_imagen(&self, prompt: &str) -> Result<String> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters { sample_count: 1 },
        };
        let response: PredictResponse = self.api.post(&self.model, "predict", &request).await?;

        response
            .predictions
            .into_iter()
            .find_map(|p| {
                p.bytes_base64_encoded
                    .map(|bytes| data_url(p.mime_type.as_deref(), &bytes))
            })
            .ok_or_else(|| ApiError::AIProvider("No image generated from Imagen".to_string()))
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    fn name(&self) -> &'static str {
        match self.mode {
            GeminiImageMode::FlashImage => "gemini",
            GeminiImageMode::Imagen => "imagen",
        }
    }

    #[instrument(skip(self, prompt))]
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        info!("Generating image, prompt_len={}", prompt.len());
        match self.mode {
            GeminiImageMode::FlashImage => self.generate_flash_image(prompt).await,
            GeminiImageMode::Imagen => self.generate_imagen(prompt).await,
        }
    }
}
