//! Passthrough Handlers - 故事 / 插图 / 旁白生成端点
//!
//! 仅接受 POST；响应体不使用统一信封，失败时返回真实状态码与 {"error": "..."}

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::domain::story::Narration;
use crate::infrastructure::http::dto::{
    GenerateAudioResponse, GenerateImageResponse, GenerateStoryRequest, GenerateStoryResponse,
    ParagraphRequest,
};
use crate::infrastructure::http::error::StatusError;
use crate::infrastructure::http::state::AppState;

/// 非 POST 请求
pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// 无法解析的请求体按空请求处理，由字段校验给出错误
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unparseable request body");
            T::default()
        }
    }
}

pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateStoryRequest>, JsonRejection>,
) -> Result<Json<GenerateStoryResponse>, StatusError> {
    let req = body_or_default(payload);

    let story_text = state
        .passthrough
        .generate_story(req.prompt.as_deref(), req.story_length)
        .await?;

    Ok(Json(GenerateStoryResponse { story_text }))
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ParagraphRequest>, JsonRejection>,
) -> Result<Json<GenerateImageResponse>, StatusError> {
    let req = body_or_default(payload);

    let image = state
        .passthrough
        .generate_image(req.paragraph_text.as_deref())
        .await?;

    Ok(Json(GenerateImageResponse {
        image_url: image.as_str().to_string(),
    }))
}

pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ParagraphRequest>, JsonRejection>,
) -> Json<GenerateAudioResponse> {
    let req = body_or_default(payload);

    let audio_data = state
        .passthrough
        .generate_audio(req.paragraph_text.as_deref())
        .await
        .map(|narration| match narration {
            Narration::Speech(text) => text,
            Narration::Clip(url) => url,
        });

    Json(GenerateAudioResponse { audio_data })
}
