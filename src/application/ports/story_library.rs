//! Story Library Port - 预生成故事库抽象
//!
//! 故事库中每个故事是一个目录，包含 story.txt 与 image_1.png .. image_N.png

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Story not found or invalid: {0}")]
    NotFound(String),

    #[error("Could not read story file: {0}")]
    ReadError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 故事库中的一个故事
#[derive(Debug, Clone)]
pub struct LibraryStory {
    /// 目录名
    pub name: String,
    /// story.txt 原文
    pub text: String,
    /// 插图路径（相对故事库根目录，按顺序）
    pub image_paths: Vec<String>,
}

/// Story Library Port
#[async_trait]
pub trait StoryLibraryPort: Send + Sync {
    /// 列出所有有效故事（按名称排序）
    async fn list(&self) -> Result<Vec<String>, LibraryError>;

    /// 读取指定故事；无效或不存在时返回 NotFound
    async fn read(&self, name: &str) -> Result<LibraryStory, LibraryError>;

    /// 保存故事正文到指定目录，返回 story.txt 路径
    async fn save(&self, folder: &str, text: &str) -> Result<PathBuf, LibraryError>;
}
