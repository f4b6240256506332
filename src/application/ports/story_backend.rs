//! Story Backend Port - 故事生成后端（三个透传端点）的抽象
//!
//! 实现:
//! - LocalBackend: 进程内直接调用透传服务
//! - HttpBackendClient: 通过 HTTP 调用远端部署的透传端点
//! - FakeBackend: 测试用脚本化后端

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::story::Narration;

/// 后端调用错误
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// 后端以非 2xx 拒绝请求
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Story Backend Port
#[async_trait]
pub trait StoryBackendPort: Send + Sync {
    /// 生成故事正文
    async fn generate_story(&self, prompt: &str, story_length: u32) -> Result<String, BackendError>;

    /// 为一段文本生成插图，返回图像地址（可能是占位图）
    async fn generate_image(&self, paragraph_text: &str) -> Result<String, BackendError>;

    /// 为一段文本生成旁白；后端不提供旁白时为 None
    async fn generate_audio(&self, paragraph_text: &str) -> Result<Option<Narration>, BackendError>;
}
