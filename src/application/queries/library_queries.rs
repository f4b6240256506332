//! Library Queries - 故事库查询

use serde::Serialize;

use crate::domain::story::Slide;

/// 列出故事库中的有效故事
#[derive(Debug, Clone, Default)]
pub struct ListStories;

/// 获取故事库中的一个故事
#[derive(Debug, Clone)]
pub struct GetLibraryStory {
    pub name: String,
}

/// 故事库中故事的幻灯片
///
/// 与故事库格式保持一致：固定数量的幻灯片，可能包含空段
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStoryView {
    pub name: String,
    pub slides: Vec<Slide>,
}
