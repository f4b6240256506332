//! Session Manager Port - 放映会话生命周期管理
//!
//! 每个观看会话持有一个独立的 SlideshowController，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::slideshow::{SlideView, SlideshowController, SlideshowError};
use crate::domain::story::Story;

/// Session Manager 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Slideshow(#[from] SlideshowError),
}

/// 放映会话（in-memory）
#[derive(Debug, Clone)]
pub struct SlideshowSession {
    pub id: String,
    pub controller: SlideshowController,
    pub last_activity: DateTime<Utc>,
}

impl SlideshowSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            controller: SlideshowController::new(),
            last_activity: Utc::now(),
        }
    }
}

impl Default for SlideshowSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session Manager Port
///
/// 所有状态保存在内存中；每个操作都会刷新会话的最后活动时间
pub trait SessionManagerPort: Send + Sync {
    /// 创建新会话
    fn create(&self, session: SlideshowSession) -> Result<String, SessionError>;

    /// 渲染会话当前幻灯片
    fn render(&self, id: &str) -> Result<SlideView, SessionError>;

    /// 下一张
    fn next(&self, id: &str) -> Result<SlideView, SessionError>;

    /// 上一张
    fn previous(&self, id: &str) -> Result<SlideView, SessionError>;

    /// 加载故事（替换当前故事并回到第一张）
    fn load_story(&self, id: &str, story: Story) -> Result<SlideView, SessionError>;

    /// 标记生成开始；已有生成进行中时返回 GenerationInProgress
    fn begin_generation(&self, id: &str) -> Result<(), SessionError>;

    /// 结束生成并写入结果
    fn finish_generation(
        &self,
        id: &str,
        outcome: Result<Story, String>,
    ) -> Result<SlideView, SessionError>;

    /// 检查会话是否有效
    fn is_valid(&self, id: &str) -> bool;

    /// 关闭会话
    fn close(&self, id: &str) -> Result<(), SessionError>;

    /// 获取所有过期会话的 ID
    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String>;

    /// 获取所有会话 ID
    fn list_all(&self) -> Vec<String>;
}
