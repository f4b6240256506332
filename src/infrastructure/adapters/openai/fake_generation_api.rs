//! Fake Generation API - 用于测试和离线演示的上游替身
//!
//! 不发起网络请求，按配置返回固定的故事与插图地址，并记录收到的请求

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{ChatRequest, GenerationApiPort, ImageRequest, UpstreamError};

const DEFAULT_STORY: &str = "Once upon a time a little fox found a lantern in the woods. \
     The lantern glowed softly and showed the way home. \
     Along the path the fox met an owl who could not sleep. \
     Together they counted the stars until the owl yawned. \
     The fox curled up by the lantern and dreamed of tomorrow.";

/// Fake Generation API
pub struct FakeGenerationApi {
    credential: bool,
    story: Result<Option<String>, UpstreamError>,
    image: Result<Option<String>, UpstreamError>,
    chat_calls: AtomicUsize,
    image_calls: AtomicUsize,
    last_chat: Mutex<Option<ChatRequest>>,
    last_image_prompt: Mutex<Option<String>>,
}

impl Default for FakeGenerationApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGenerationApi {
    pub fn new() -> Self {
        Self {
            credential: true,
            story: Ok(Some(DEFAULT_STORY.to_string())),
            image: Ok(Some("https://images.example/fake.png".to_string())),
            chat_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            last_chat: Mutex::new(None),
            last_image_prompt: Mutex::new(None),
        }
    }

    /// 模拟未配置 API Key
    pub fn without_credential(mut self) -> Self {
        self.credential = false;
        self
    }

    pub fn with_story(mut self, text: &str) -> Self {
        self.story = Ok(Some(text.trim().to_string()));
        self
    }

    /// 故事请求以指定状态码失败
    pub fn failing_story(mut self, status: u16, message: &str) -> Self {
        let reason = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        self.story = Err(UpstreamError::Status {
            status,
            reason: reason.to_string(),
            message: message.to_string(),
        });
        self
    }

    /// 所有插图请求失败
    pub fn failing_images(mut self) -> Self {
        self.image = Err(UpstreamError::NetworkError("image service unavailable".to_string()));
        self
    }

    pub fn with_image_url(mut self, url: &str) -> Self {
        self.image = Ok(Some(url.to_string()));
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn last_chat_request(&self) -> Option<ChatRequest> {
        self.last_chat
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_image_prompt(&self) -> Option<String> {
        self.last_image_prompt
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl GenerationApiPort for FakeGenerationApi {
    fn has_credential(&self) -> bool {
        self.credential
    }

    async fn complete_chat(&self, request: ChatRequest) -> Result<Option<String>, UpstreamError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(prompt_len = request.user_prompt.len(), "FakeGenerationApi: chat");
        *self.last_chat.lock().unwrap_or_else(|e| e.into_inner()) = Some(request);
        self.story.clone()
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<Option<String>, UpstreamError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_image_prompt
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(request.prompt);
        self.image.clone()
    }
}
