//! Generation Client - 故事生成编排
//!
//! 流程:
//! 1. 请求故事正文（失败即终止，不产生部分故事）
//! 2. 切分为固定数量的幻灯片文本，丢弃空段
//! 3. 逐张处理；每张的插图与旁白请求并发发出
//! 4. 插图失败降级为占位图，旁白失败视为无旁白

use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::StoryBackendPort;
use crate::domain::partition;
use crate::domain::story::{ImageRef, Slide, Story};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Story generation failed: {0}")]
    StoryText(String),

    #[error("Generated story is empty")]
    EmptyStory,
}

/// 故事生成客户端
pub struct GenerationClient {
    backend: Arc<dyn StoryBackendPort>,
    slide_count: usize,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn StoryBackendPort>, slide_count: usize) -> Self {
        Self {
            backend,
            slide_count,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// 生成完整故事
    pub async fn generate(&self, prompt: &str) -> Result<Story, GenerationError> {
        let story_length = u32::try_from(self.slide_count).unwrap_or(u32::MAX);
        let text = self
            .backend
            .generate_story(prompt, story_length)
            .await
            .map_err(|e| GenerationError::StoryText(e.to_string()))?;

        let paragraphs: Vec<String> = partition(&text, self.slide_count)
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();

        if paragraphs.is_empty() {
            return Err(GenerationError::EmptyStory);
        }

        tracing::info!(
            slides = paragraphs.len(),
            text_len = text.len(),
            "Story text partitioned"
        );

        let mut slides = Vec::with_capacity(paragraphs.len());
        for (index, paragraph) in paragraphs.into_iter().enumerate() {
            slides.push(self.build_slide(index, paragraph).await);
        }

        Story::new(slides).map_err(|_| GenerationError::EmptyStory)
    }

    /// 为一段文本补齐插图与旁白
    async fn build_slide(&self, index: usize, paragraph: String) -> Slide {
        let (image, audio) = tokio::join!(
            self.backend.generate_image(&paragraph),
            self.backend.generate_audio(&paragraph),
        );

        let image = match image {
            Ok(url) => ImageRef::url(url),
            Err(e) => {
                tracing::warn!(slide = index, error = %e, "Image generation failed, using placeholder");
                ImageRef::placeholder()
            }
        };

        let audio = match audio {
            Ok(narration) => narration,
            Err(e) => {
                tracing::warn!(slide = index, error = %e, "Audio generation failed, continuing without narration");
                None
            }
        };

        Slide::new(paragraph, image, audio)
    }
}
