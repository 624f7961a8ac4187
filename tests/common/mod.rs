#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use kamiscroll::error::GenerationError;
use kamiscroll::routes;
use kamiscroll::services::{ImageBackend, StoryBackend};
use kamiscroll::state::AppState;
use tokio::sync::Notify;
use tower::ServiceExt;

pub const STORY_REPLY: &str = r#"Here is your webtoon!
{
  "title": "Nine Tails Contract",
  "plot": "Ren trades a year of his life for rent money.",
  "characters": [
    {"name": "Ren", "appearance": "messy black hair, tired grey eyes, oversized hoodie", "personality": "broke but stubborn", "role": "protagonist"},
    {"name": "Kuzu", "appearance": "white fox with nine tails and a red collar", "personality": "playful", "role": "demon"}
  ],
  "pages": [
    {"pageNumber": 1, "panels": [
      {"visualPrompt": "Ren counts coins in a tiny apartment, wide shot", "dialogue": "Three hundred yen...", "sfx": "CLINK"},
      {"visualPrompt": "Kuzu appears in blue fire, dutch angle", "dialogue": "Need a deal?", "sfx": "FWOOSH", "narration": "Midnight."}
    ]},
    {"pageNumber": 2, "panels": [
      {"visualPrompt": "Ren shakes the fox's paw, close-up", "dialogue": "Deal.", "sfx": "", "status": "ready"}
    ]}
  ],
  "twistMoment": "Kuzu is Ren's future self."
}
Good luck!"#;

/// Text backend that always returns the same reply, or fails.
pub struct FakeLlm {
    pub reply: Option<String>,
    pub calls: Mutex<usize>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: Mutex::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl StoryBackend for FakeLlm {
    fn name(&self) -> &str {
        "fake-llm"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        *self.calls.lock().unwrap() += 1;
        self.reply.clone().ok_or(GenerationError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })
    }
}

/// Image backend that succeeds unless the scene contains `fail_marker`.
pub struct FakeImages {
    pub fail_marker: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail_marker: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_on(marker: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_marker: Some(marker.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ImageBackend for FakeImages {
    fn name(&self) -> &str {
        "fake-images"
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.fail_marker {
            Some(marker) if prompt.contains(marker.as_str()) => Err(GenerationError::MissingImage),
            _ => Ok("data:image/png;base64,iVBORw0KGgo=".to_string()),
        }
    }
}

/// Image backend whose reply names the scene it drew. Requests for the scene
/// containing `held` wait until `gate` is notified.
pub struct GatedImages {
    pub held: String,
    pub gate: Notify,
    pub prompts: Mutex<Vec<String>>,
}

impl GatedImages {
    pub fn holding(marker: &str) -> Arc<Self> {
        Arc::new(Self {
            held: marker.to_string(),
            gate: Notify::new(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn image_for(scene: &str) -> String {
        format!("image-for:{scene}")
    }
}

pub fn scene_of(prompt: &str) -> String {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix("Scene Description: "))
        .map(|s| s.trim_end_matches('.').to_string())
        .unwrap_or_default()
}

#[async_trait]
impl ImageBackend for GatedImages {
    fn name(&self) -> &str {
        "gated-images"
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let scene = scene_of(prompt);
        if scene.contains(self.held.as_str()) {
            self.gate.notified().await;
        }
        Ok(Self::image_for(&scene))
    }
}

pub fn build_test_app(llm: Arc<FakeLlm>, images: Arc<dyn ImageBackend>) -> (Router, AppState) {
    let state = AppState::new(llm, images, Duration::from_secs(5), Duration::from_secs(5));
    (routes::router(state.clone()), state)
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
