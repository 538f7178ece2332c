use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request},
    response::Response,
    Router,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use taleweaver::{
    config::ImagePolicy,
    services::{
        providers::{ImageProvider, TextProvider},
        StoryService,
    },
    ApiError, AppState, Result,
};

const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Text provider returning a canned reply (or a provider error) and counting calls
pub struct StubText {
    reply: String,
    unreachable: bool,
    pub calls: AtomicUsize,
}

impl StubText {
    pub fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            unreachable: false,
            calls: AtomicUsize::new(0),
        })
    }

    /// Every call fails as if the backend were down
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            unreachable: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for StubText {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(ApiError::AIProvider(
                "stub backend error 503: service unavailable".to_string(),
            ));
        }
        if self.reply.is_empty() {
            return Err(ApiError::EmptyReply("stub"));
        }
        Ok(self.reply.clone())
    }
}

/// Image provider that fails for prompts mentioning a marker
pub struct StubImages {
    fail_marker: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl StubImages {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_marker: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing_on(marker: &'static str) -> Arc<Self> {
        Arc::new(Self {
            fail_marker: Some(marker),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for StubImages {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = self.fail_marker {
            if prompt.contains(marker) {
                return Err(ApiError::AIProvider("stub image failure".to_string()));
            }
        }
        Ok("data:image/png;base64,iVBORw0KGgo=".to_string())
    }
}

pub fn router(text: Arc<StubText>, images: Arc<StubImages>, policy: ImagePolicy) -> Router {
    let service = StoryService::new(text, images, policy);
    taleweaver::create_router(AppState::from_service(Arc::new(service)))
}

/// A provider reply with `count` pages whose image prompts are `scene-<i>`
pub fn page_array(count: usize) -> String {
    let pages: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "text": format!("Page {} of the story.", i + 1),
                "imagePrompt": format!("scene-{}", i),
            })
        })
        .collect();
    serde_json::to_string_pretty(&pages).expect("serialize pages")
}

pub fn valid_body(story_length: &str) -> serde_json::Value {
    serde_json::json!({
        "ageRange": "6-8",
        "theme": "adventure",
        "characterName": "Milo",
        "characterTraits": "brave, curious",
        "storyLength": story_length,
    })
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}
