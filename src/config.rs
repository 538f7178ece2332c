use config::builder::{ConfigBuilder, DefaultState};
use config::ConfigError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub provider: ProviderConfig,
    pub story: StoryConfigSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

/// Which generative-text backend writes the story pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TextBackend {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAI,
}

/// Which generative-image backend draws the illustrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ImageBackend {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "imagen")]
    Imagen,
    #[serde(rename = "openai")]
    OpenAI,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub text_backend: TextBackend,
    pub image_backend: ImageBackend,
    pub request_timeout_ms: u64,
    pub gemini: GeminiConfig,
    pub openai: OpenAIConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub imagen_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub text_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub image_model: String,
    pub image_size: String,
    pub image_quality: String,
}

/// How many illustrations a story gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    /// One image per page, requested concurrently
    #[default]
    PerPage,
    /// A single cover image attached to the first page
    CoverOnly,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryConfigSection {
    #[serde(default)]
    pub image_policy: ImagePolicy,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (for environment variable overrides)
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            // config.yml is optional, every key has a default
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("TALEWEAVER")
                    .separator("__")
                    .try_parsing(true),
            )
            // Conventional variable names win over everything else
            .set_override_option("provider.gemini.api_key", non_empty_var("GEMINI_API_KEY"))?
            .set_override_option("provider.openai.api_key", non_empty_var("OPENAI_API_KEY"))?
            .set_override_option("server.port", non_empty_var("PORT"))?
            .set_override_option("cors.allowed_origin", non_empty_var("FRONTEND_URL"))?
            .build()?;

        config.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("cors.allowed_origin", "http://localhost:5173")?
            .set_default("provider.text_backend", "gemini")?
            .set_default("provider.image_backend", "gemini")?
            .set_default("provider.request_timeout_ms", 120_000)?
            .set_default(
                "provider.gemini.api_base",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("provider.gemini.text_model", "gemini-2.5-flash")?
            .set_default("provider.gemini.image_model", "gemini-2.5-flash-image")?
            .set_default("provider.gemini.imagen_model", "imagen-4.0-generate-001")?
            .set_default("provider.openai.api_base", "https://api.openai.com/v1")?
            .set_default("provider.openai.text_model", "gpt-4o-mini")?
            .set_default("provider.openai.temperature", 0.8)?
            .set_default("provider.openai.max_tokens", 3000)?
            .set_default("provider.openai.image_model", "dall-e-3")?
            .set_default("provider.openai.image_size", "1024x1024")?
            .set_default("provider.openai.image_quality", "standard")?
            .set_default("story.image_policy", "per_page")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
