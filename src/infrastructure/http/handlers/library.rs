//! Library Handlers - 预生成故事库

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{GetLibraryStory, LibraryStoryView, ListStories};
use crate::infrastructure::http::error::StatusError;
use crate::infrastructure::http::state::AppState;

/// 列出有效故事
pub async fn list_stories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, StatusError> {
    let names = state.list_stories_handler.handle(ListStories).await?;
    Ok(Json(names))
}

/// 获取故事的幻灯片
pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<LibraryStoryView>, StatusError> {
    let view = state
        .get_library_story_handler
        .handle(GetLibraryStory { name })
        .await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::infrastructure::adapters::{FakeBackend, FakeGenerationApi};
    use crate::infrastructure::http::routes::create_routes;
    use crate::infrastructure::http::state::test_support::test_state;

    fn write_story(root: &Path, name: &str, text: &str, images: usize) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("story.txt"), text).unwrap();
        for i in 1..=images {
            std::fs::write(dir.join(format!("image_{}.png", i)), b"png").unwrap();
        }
    }

    fn app(dir: &TempDir) -> Router {
        create_routes().with_state(test_state(
            FakeGenerationApi::new(),
            FakeBackend::new(""),
            dir.path(),
        ))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_stories() {
        let dir = TempDir::new().unwrap();
        write_story(dir.path(), "moon_boat", "a b c d", 4);
        write_story(dir.path(), "broken", "a b c d", 2);

        let (status, body) = get(app(&dir), "/api/stories").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["moon_boat"]));
    }

    #[tokio::test]
    async fn test_get_story_slides() {
        let dir = TempDir::new().unwrap();
        write_story(dir.path(), "moon_boat", "a b c d e f g h", 4);

        let (status, body) = get(app(&dir), "/api/story/moon_boat").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "moon_boat");
        let slides = body["slides"].as_array().unwrap();
        assert_eq!(slides.len(), 4);
        assert_eq!(slides[0]["paragraph"], "a b");
        assert_eq!(slides[0]["image"], "/story_assets/moon_boat/image_1.png");
        assert!(slides[0]["audio"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_story_is_404() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get(app(&dir), "/api/story/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Story not found or invalid"}));
    }
}
