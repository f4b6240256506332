//! Local Backend - 进程内调用透传服务
//!
//! 与 HTTP 端点共享同一套校验与降级逻辑，省去一次网络往返

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{BackendError, StoryBackendPort};
use crate::application::services::{PassthroughError, PassthroughService};
use crate::domain::story::Narration;

pub struct LocalBackend {
    service: Arc<PassthroughService>,
}

impl LocalBackend {
    pub fn new(service: Arc<PassthroughService>) -> Self {
        Self { service }
    }
}

fn rejected(err: PassthroughError) -> BackendError {
    BackendError::Rejected {
        status: err.status_code(),
        message: err.to_string(),
    }
}

#[async_trait]
impl StoryBackendPort for LocalBackend {
    async fn generate_story(&self, prompt: &str, story_length: u32) -> Result<String, BackendError> {
        self.service
            .generate_story(Some(prompt), Some(story_length))
            .await
            .map_err(rejected)
    }

    async fn generate_image(&self, paragraph_text: &str) -> Result<String, BackendError> {
        let image = self
            .service
            .generate_image(Some(paragraph_text))
            .await
            .map_err(rejected)?;
        Ok(image.as_str().to_string())
    }

    async fn generate_audio(&self, paragraph_text: &str) -> Result<Option<Narration>, BackendError> {
        Ok(self.service.generate_audio(Some(paragraph_text)).await)
    }
}
