//! Slideshow Handlers - 放映会话 API

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CloseSessionCommand, Direction, GenerateStoryCommand, GetCurrentSlide, LoadStoryCommand,
    NavigateCommand, OpenSessionCommand,
};
use crate::domain::slideshow::SlideView;
use crate::infrastructure::http::dto::{
    ApiResponse, CloseSessionResponseDto, GenerateRequest, LoadStoryRequest,
    OpenSessionResponseDto, SessionRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

type ViewResult = Result<Json<ApiResponse<SlideView>>, ApiError>;

// ============================================================================
// Open / Close
// ============================================================================

pub async fn open_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<OpenSessionResponseDto>>, ApiError> {
    let result = state.open_session_handler.handle(OpenSessionCommand)?;

    Ok(Json(ApiResponse::success(OpenSessionResponseDto {
        session_id: result.session_id,
        view: result.view,
    })))
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<CloseSessionResponseDto>>, ApiError> {
    let result = state.close_session_handler.handle(CloseSessionCommand {
        session_id: req.session_id,
    })?;

    Ok(Json(ApiResponse::success(CloseSessionResponseDto {
        session_id: result.session_id,
    })))
}

// ============================================================================
// Story
// ============================================================================

/// 生成新故事；生成失败时返回 state=failed 的视图
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> ViewResult {
    let view = state
        .generate_story_handler
        .handle(GenerateStoryCommand {
            session_id: req.session_id,
            prompt: req.prompt,
        })
        .await?;

    Ok(Json(ApiResponse::success(view)))
}

/// 从故事库加载故事
pub async fn load_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadStoryRequest>,
) -> ViewResult {
    let view = state
        .load_story_handler
        .handle(LoadStoryCommand {
            session_id: req.session_id,
            story_name: req.story,
        })
        .await?;

    Ok(Json(ApiResponse::success(view)))
}

// ============================================================================
// Navigation
// ============================================================================

pub async fn next_slide(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> ViewResult {
    navigate(&state, req.session_id, Direction::Next)
}

pub async fn previous_slide(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> ViewResult {
    navigate(&state, req.session_id, Direction::Previous)
}

fn navigate(state: &AppState, session_id: String, direction: Direction) -> ViewResult {
    let view = state.navigate_handler.handle(NavigateCommand {
        session_id,
        direction,
    })?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn current_slide(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> ViewResult {
    let view = state.get_current_slide_handler.handle(GetCurrentSlide {
        session_id: req.session_id,
    })?;
    Ok(Json(ApiResponse::success(view)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::application::ports::BackendError;
    use crate::infrastructure::adapters::{FakeBackend, FakeGenerationApi};
    use crate::infrastructure::http::routes::create_routes;
    use crate::infrastructure::http::state::test_support::test_state;

    const STORY: &str = "Pip the puppy chased fireflies at dusk. The fireflies led him to a pond. \
                         A frog sang him a lullaby there. Pip walked home and fell fast asleep.";

    struct TestApp {
        router: Router,
        _dir: TempDir,
    }

    impl TestApp {
        fn new(backend: FakeBackend) -> Self {
            let dir = TempDir::new().unwrap();
            let router = create_routes().with_state(test_state(
                FakeGenerationApi::new(),
                backend,
                dir.path(),
            ));
            Self { router, _dir: dir }
        }

        async fn post(&self, uri: &str, body: Value) -> Value {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            let response = self.router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            serde_json::from_slice(&bytes).unwrap()
        }

        async fn open(&self) -> String {
            let body = self.post("/api/slideshow/open", json!({})).await;
            assert_eq!(body["errno"], 0);
            assert_eq!(body["data"]["view"]["state"], "empty");
            body["data"]["session_id"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn test_generate_and_navigate() {
        let app = TestApp::new(FakeBackend::new(STORY));
        let id = app.open().await;

        let body = app
            .post(
                "/api/slideshow/generate",
                json!({"session_id": id, "prompt": "a puppy"}),
            )
            .await;
        let view = &body["data"];
        assert_eq!(view["state"], "loaded");
        assert_eq!(view["counter"], "1 / 4");
        assert_eq!(view["can_previous"], false);
        assert_eq!(view["can_next"], true);
        assert!(view["slide"]["paragraph"].as_str().unwrap().starts_with("Pip"));

        let body = app.post("/api/slideshow/next", json!({"session_id": id})).await;
        assert_eq!(body["data"]["index"], 1);
        assert_eq!(body["data"]["can_previous"], true);

        let body = app.post("/api/slideshow/previous", json!({"session_id": id})).await;
        assert_eq!(body["data"]["index"], 0);

        let body = app.post("/api/slideshow/current", json!({"session_id": id})).await;
        assert_eq!(body["data"]["counter"], "1 / 4");
    }

    #[tokio::test]
    async fn test_generation_failure_view() {
        let app = TestApp::new(FakeBackend::failing_story(BackendError::Rejected {
            status: 500,
            message: "OpenAI API Key not configured on server.".to_string(),
        }));
        let id = app.open().await;

        let body = app.post("/api/slideshow/generate", json!({"session_id": id})).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["state"], "failed");
        assert_eq!(body["data"]["can_generate"], true);
        assert!(body["data"]["error"]
            .as_str()
            .unwrap()
            .contains("OpenAI API Key not configured"));
    }

    #[tokio::test]
    async fn test_navigation_before_story_is_rejected() {
        let app = TestApp::new(FakeBackend::new(STORY));
        let id = app.open().await;

        let body = app.post("/api/slideshow/next", json!({"session_id": id})).await;
        assert_eq!(body["errno"], 400);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let app = TestApp::new(FakeBackend::new(STORY));
        let body = app
            .post("/api/slideshow/current", json!({"session_id": "missing"}))
            .await;
        assert_eq!(body["errno"], 404);
    }

    #[tokio::test]
    async fn test_close_session() {
        let app = TestApp::new(FakeBackend::new(STORY));
        let id = app.open().await;

        let body = app.post("/api/slideshow/close", json!({"session_id": id})).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["session_id"], id.as_str());

        let body = app.post("/api/slideshow/close", json!({"session_id": id})).await;
        assert_eq!(body["errno"], 404);
    }
}
