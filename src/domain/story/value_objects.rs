//! Story Context - Value Objects

use serde::{Deserialize, Serialize};

/// 插图不可用时使用的占位图
pub const PLACEHOLDER_IMAGE: &str = "placeholder.png";

/// 插图引用：真实 URL 或占位图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn url(url: impl Into<String>) -> Self {
        let url = url.into();
        if url.trim().is_empty() {
            return Self::placeholder();
        }
        Self(url)
    }

    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_IMAGE.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_IMAGE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 旁白标记
///
/// - `Speech`: 交给端侧语音合成朗读的文本
/// - `Clip`: 预先渲染好的音频地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Narration {
    Speech(String),
    Clip(String),
}

impl Narration {
    /// 解析后端返回的 `audioData`
    ///
    /// URL（http/https/data）视为音频片段，其余非空文本视为朗读文本
    pub fn from_marker(marker: &str) -> Option<Self> {
        let marker = marker.trim();
        if marker.is_empty() {
            return None;
        }
        let is_url = ["http://", "https://", "data:"]
            .iter()
            .any(|scheme| marker.starts_with(scheme));
        if is_url {
            Some(Self::Clip(marker.to_string()))
        } else {
            Some(Self::Speech(marker.to_string()))
        }
    }
}
