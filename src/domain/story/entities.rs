//! Story Context - Entities

use serde::{Deserialize, Serialize};

use super::{ImageRef, Narration, StoryError};

/// 幻灯片 - 一段故事文本配一张插图和可选旁白
///
/// 构造后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    paragraph: String,
    image: ImageRef,
    audio: Option<Narration>,
}

impl Slide {
    pub fn new(paragraph: impl Into<String>, image: ImageRef, audio: Option<Narration>) -> Self {
        Self {
            paragraph: paragraph.into(),
            image,
            audio,
        }
    }

    pub fn paragraph(&self) -> &str {
        &self.paragraph
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn audio(&self) -> Option<&Narration> {
        self.audio.as_ref()
    }
}

/// Story 聚合根
///
/// 不变量:
/// - 至少包含一张幻灯片
/// - 每张幻灯片文本非空
/// - 插入顺序即阅读顺序，整体替换而不局部修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    title: Option<String>,
    slides: Vec<Slide>,
}

impl Story {
    pub fn new(slides: Vec<Slide>) -> Result<Self, StoryError> {
        if slides.is_empty() {
            return Err(StoryError::Empty);
        }
        if let Some(index) = slides.iter().position(|s| s.paragraph.trim().is_empty()) {
            return Err(StoryError::EmptyParagraph(index));
        }
        Ok(Self {
            title: None,
            slides,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// 恒为 false，空故事无法构造
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}
