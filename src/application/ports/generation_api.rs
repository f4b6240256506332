//! Generation API Port - 上游文本/图像生成服务抽象
//!
//! 具体实现在 infrastructure/adapters/openai

use async_trait::async_trait;
use thiserror::Error;

/// 上游调用错误
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("Upstream credential is not configured")]
    MissingCredential,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    /// 上游返回非 2xx
    #[error("Upstream returned {status} {reason}: {message}")]
    Status {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 对话补全请求
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 图像生成请求
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
}

/// Generation API Port
#[async_trait]
pub trait GenerationApiPort: Send + Sync {
    /// 是否配置了上游凭证
    fn has_credential(&self) -> bool;

    /// 对话补全，返回去除首尾空白后的文本；上游未返回内容时为 None
    async fn complete_chat(&self, request: ChatRequest) -> Result<Option<String>, UpstreamError>;

    /// 生成单张图像，返回图像 URL；上游未返回 URL 时为 None
    async fn generate_image(&self, request: ImageRequest) -> Result<Option<String>, UpstreamError>;
}
