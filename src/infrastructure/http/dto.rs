//! Data Transfer Objects

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::slideshow::SlideView;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Passthrough DTOs（字段名与前端约定一致，使用 camelCase）
//
// 字段按宽松规则解析：类型不符的字段视为缺失，不影响其它字段
// ============================================================================

/// 字符串或数字均接受为文本
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// 非负整数或数字字符串（如 "5"）
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub story_length: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryResponse {
    pub story_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub paragraph_text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioResponse {
    pub audio_data: Option<String>,
}

// ============================================================================
// Slideshow DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub session_id: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoadStoryRequest {
    pub session_id: String,
    pub story: String,
}

#[derive(Debug, Serialize)]
pub struct OpenSessionResponseDto {
    pub session_id: String,
    pub view: SlideView,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponseDto {
    pub session_id: String,
}
