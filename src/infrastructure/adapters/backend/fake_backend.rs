//! Fake Backend - 脚本化的故事后端
//!
//! 用于测试与离线演示：返回固定故事正文，插图地址按调用序号生成

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{BackendError, StoryBackendPort};
use crate::domain::story::Narration;

pub struct FakeBackend {
    story: Result<String, BackendError>,
    story_delay: Option<Duration>,
    failing_image_marker: Option<String>,
    audio: Result<Option<Narration>, BackendError>,
    image_calls: AtomicUsize,
    audio_calls: AtomicUsize,
    /// 0 表示尚未收到故事请求
    last_story_length: AtomicU32,
}

impl FakeBackend {
    pub fn new(story_text: impl Into<String>) -> Self {
        Self {
            story: Ok(story_text.into()),
            story_delay: None,
            failing_image_marker: None,
            audio: Ok(None),
            image_calls: AtomicUsize::new(0),
            audio_calls: AtomicUsize::new(0),
            last_story_length: AtomicU32::new(0),
        }
    }

    /// 故事请求总是失败
    pub fn failing_story(error: BackendError) -> Self {
        Self {
            story: Err(error),
            ..Self::new("")
        }
    }

    /// 故事正文延迟返回
    pub fn with_story_delay(mut self, delay: Duration) -> Self {
        self.story_delay = Some(delay);
        self
    }

    /// 文本包含 marker 的插图请求失败
    pub fn failing_images_containing(mut self, marker: &str) -> Self {
        self.failing_image_marker = Some(marker.to_string());
        self
    }

    pub fn failing_audio(mut self) -> Self {
        self.audio = Err(BackendError::NetworkError("audio service unavailable".to_string()));
        self
    }

    pub fn with_audio(mut self, narration: Narration) -> Self {
        self.audio = Ok(Some(narration));
        self
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn audio_calls(&self) -> usize {
        self.audio_calls.load(Ordering::SeqCst)
    }

    pub fn last_story_length(&self) -> Option<u32> {
        match self.last_story_length.load(Ordering::SeqCst) {
            0 => None,
            n => Some(n),
        }
    }
}

#[async_trait]
impl StoryBackendPort for FakeBackend {
    async fn generate_story(&self, _prompt: &str, story_length: u32) -> Result<String, BackendError> {
        self.last_story_length.store(story_length, Ordering::SeqCst);
        if let Some(delay) = self.story_delay {
            tokio::time::sleep(delay).await;
        }
        self.story.clone()
    }

    async fn generate_image(&self, paragraph_text: &str) -> Result<String, BackendError> {
        let n = self.image_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(marker) = &self.failing_image_marker {
            if paragraph_text.contains(marker.as_str()) {
                return Err(BackendError::Rejected {
                    status: 500,
                    message: "image generation failed".to_string(),
                });
            }
        }
        Ok(format!("https://images.example/slide_{}.png", n))
    }

    async fn generate_audio(&self, _paragraph_text: &str) -> Result<Option<Narration>, BackendError> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        self.audio.clone()
    }
}
