//! Slideshow Commands - 放映会话相关命令

use crate::domain::slideshow::SlideView;

/// 打开放映会话命令
#[derive(Debug, Clone, Default)]
pub struct OpenSessionCommand;

/// 打开放映会话响应
#[derive(Debug, Clone)]
pub struct OpenSessionResponse {
    pub session_id: String,
    pub view: SlideView,
}

/// 生成故事命令；prompt 为空时使用默认提示词
#[derive(Debug, Clone)]
pub struct GenerateStoryCommand {
    pub session_id: String,
    pub prompt: Option<String>,
}

/// 从故事库加载故事命令
#[derive(Debug, Clone)]
pub struct LoadStoryCommand {
    pub session_id: String,
    pub story_name: String,
}

/// 翻页方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// 翻页命令
#[derive(Debug, Clone)]
pub struct NavigateCommand {
    pub session_id: String,
    pub direction: Direction,
}

/// 关闭会话命令
#[derive(Debug, Clone)]
pub struct CloseSessionCommand {
    pub session_id: String,
}

/// 关闭会话响应
#[derive(Debug, Clone)]
pub struct CloseSessionResponse {
    pub session_id: String,
}
