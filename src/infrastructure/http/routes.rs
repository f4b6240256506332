//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                   GET   健康检查
//! - /api/generate-story         POST  生成故事正文（其它方法 405）
//! - /api/generate-image         POST  生成插图（其它方法 405）
//! - /api/generate-audio         POST  生成旁白（其它方法 405）
//! - /api/slideshow/open         POST  创建放映会话
//! - /api/slideshow/generate     POST  生成并加载新故事
//! - /api/slideshow/load         POST  加载故事库中的故事
//! - /api/slideshow/next         POST  下一张
//! - /api/slideshow/previous     POST  上一张
//! - /api/slideshow/current      POST  当前幻灯片
//! - /api/slideshow/close        POST  关闭会话
//! - /api/stories                GET   列出故事库
//! - /api/story/:name            GET   获取故事库中的故事

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有 API 路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .merge(generation_routes())
        .nest("/slideshow", slideshow_routes())
        .merge(library_routes())
}

/// 生成端点，仅接受 POST
fn generation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/generate-story",
            post(handlers::generate_story).fallback(handlers::method_not_allowed),
        )
        .route(
            "/generate-image",
            post(handlers::generate_image).fallback(handlers::method_not_allowed),
        )
        .route(
            "/generate-audio",
            post(handlers::generate_audio).fallback(handlers::method_not_allowed),
        )
}

/// Slideshow 路由
fn slideshow_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/open", post(handlers::open_session))
        .route("/generate", post(handlers::generate))
        .route("/load", post(handlers::load_story))
        .route("/next", post(handlers::next_slide))
        .route("/previous", post(handlers::previous_slide))
        .route("/current", post(handlers::current_slide))
        .route("/close", post(handlers::close_session))
}

/// 故事库路由
fn library_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stories", get(handlers::list_stories))
        .route("/story/:name", get(handlers::get_story))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::infrastructure::adapters::{FakeBackend, FakeGenerationApi};
    use crate::infrastructure::http::state::test_support::test_state;

    #[tokio::test]
    async fn test_ping() {
        let dir = TempDir::new().unwrap();
        let app = create_routes().with_state(test_state(
            FakeGenerationApi::new(),
            FakeBackend::new(""),
            dir.path(),
        ));

        let request = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["service"], "storytime");
    }
}
