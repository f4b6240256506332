//! Passthrough Service - 生成端点透传逻辑
//!
//! 错误策略:
//! - 故事正文：上游失败原样透传状态码
//! - 插图：除缺少凭证外一律降级为占位图
//! - 旁白：未实现，总是返回空

use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::{ChatRequest, GenerationApiPort, ImageRequest, UpstreamError};
use crate::domain::story::{ImageRef, Narration};

/// 插图提示词最大长度（字符）
pub const MAX_IMAGE_PROMPT_CHARS: usize = 900;

const ILLUSTRATION_STYLE: &str = "Children's book illustration style: ";

/// 透传端点错误，每种错误对应固定的 HTTP 状态码
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassthroughError {
    #[error("OpenAI API Key not configured on server.")]
    MissingCredential,

    #[error("Missing prompt in request body.")]
    MissingPrompt,

    #[error("Missing storyLength in request body.")]
    MissingStoryLength,

    #[error("OpenAI API request failed: {reason} - {message}")]
    Upstream {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("No story content received from OpenAI.")]
    EmptyContent,

    #[error("Internal Server Error: Failed to generate story.")]
    Internal,
}

impl PassthroughError {
    pub fn status_code(&self) -> u16 {
        match self {
            PassthroughError::MissingPrompt | PassthroughError::MissingStoryLength => 400,
            PassthroughError::Upstream { status, .. } => *status,
            PassthroughError::MissingCredential
            | PassthroughError::EmptyContent
            | PassthroughError::Internal => 500,
        }
    }
}

/// 故事生成参数
#[derive(Debug, Clone)]
pub struct PassthroughSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for PassthroughSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// 故事正文的系统提示词
pub fn story_system_prompt(story_length: u32) -> String {
    format!(
        "You are a creative storyteller. Generate a happy, simple bedtime story suitable for young children. \
         The story should ideally be around {} paragraphs long. Respond *only* with the story text.",
        story_length
    )
}

/// 插图提示词：截断到 900 字符并加上绘本风格前缀
pub fn illustration_prompt(paragraph_text: &str) -> String {
    let truncated: String = paragraph_text.chars().take(MAX_IMAGE_PROMPT_CHARS).collect();
    format!("{}{}", ILLUSTRATION_STYLE, truncated)
}

/// 透传服务
pub struct PassthroughService {
    api: Arc<dyn GenerationApiPort>,
    settings: PassthroughSettings,
}

impl PassthroughService {
    pub fn new(api: Arc<dyn GenerationApiPort>, settings: PassthroughSettings) -> Self {
        Self { api, settings }
    }

    /// 生成故事正文
    pub async fn generate_story(
        &self,
        prompt: Option<&str>,
        story_length: Option<u32>,
    ) -> Result<String, PassthroughError> {
        if !self.api.has_credential() {
            return Err(PassthroughError::MissingCredential);
        }
        let prompt = match prompt {
            Some(p) if !p.is_empty() => p,
            _ => return Err(PassthroughError::MissingPrompt),
        };
        let story_length = match story_length {
            Some(n) if n > 0 => n,
            _ => return Err(PassthroughError::MissingStoryLength),
        };

        let request = ChatRequest {
            system_prompt: story_system_prompt(story_length),
            user_prompt: prompt.to_string(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        match self.api.complete_chat(request).await {
            Ok(Some(text)) if !text.trim().is_empty() => {
                tracing::info!(story_length, text_len = text.len(), "Story text generated");
                Ok(text.trim().to_string())
            }
            Ok(_) => {
                tracing::error!("Upstream returned no story content");
                Err(PassthroughError::EmptyContent)
            }
            Err(UpstreamError::Status {
                status,
                reason,
                message,
            }) => {
                tracing::error!(status, reason = %reason, message = %message, "Story API error");
                Err(PassthroughError::Upstream {
                    status,
                    reason,
                    message,
                })
            }
            Err(UpstreamError::MissingCredential) => Err(PassthroughError::MissingCredential),
            Err(e) => {
                tracing::error!(error = %e, "Error calling story completion API");
                Err(PassthroughError::Internal)
            }
        }
    }

    /// 生成插图；除缺少凭证外永不失败
    pub async fn generate_image(
        &self,
        paragraph_text: Option<&str>,
    ) -> Result<ImageRef, PassthroughError> {
        if !self.api.has_credential() {
            return Err(PassthroughError::MissingCredential);
        }
        let paragraph_text = match paragraph_text {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(ImageRef::placeholder()),
        };

        let request = ImageRequest {
            prompt: illustration_prompt(paragraph_text),
        };

        match self.api.generate_image(request).await {
            Ok(Some(url)) => Ok(ImageRef::url(url)),
            Ok(None) => {
                tracing::warn!("Image API returned no URL, using placeholder");
                Ok(ImageRef::placeholder())
            }
            Err(UpstreamError::MissingCredential) => Err(PassthroughError::MissingCredential),
            Err(e) => {
                tracing::warn!(error = %e, "Image API error, using placeholder");
                Ok(ImageRef::placeholder())
            }
        }
    }

    /// 旁白生成尚未提供
    pub async fn generate_audio(&self, paragraph_text: Option<&str>) -> Option<Narration> {
        tracing::debug!(
            text_len = paragraph_text.map(str::len).unwrap_or(0),
            "Audio generation requested, but narration is not offered"
        );
        None
    }
}
