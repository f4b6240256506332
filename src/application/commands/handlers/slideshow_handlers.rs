//! Slideshow Command Handlers

use std::sync::Arc;

use crate::application::commands::slideshow_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{SessionManagerPort, SlideshowSession, StoryLibraryPort};
use crate::application::queries::handlers::library_slides;
use crate::application::services::GenerationClient;
use crate::domain::slideshow::SlideView;
use crate::domain::story::{extract_title, Story};

/// OpenSession Handler - 创建放映会话
pub struct OpenSessionHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl OpenSessionHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub fn handle(&self, _cmd: OpenSessionCommand) -> Result<OpenSessionResponse, ApplicationError> {
        let session_id = self.session_manager.create(SlideshowSession::new())?;
        let view = self.session_manager.render(&session_id)?;
        Ok(OpenSessionResponse { session_id, view })
    }
}

/// GenerateStory Handler - 生成新故事并加载到会话
///
/// 生成失败时会话进入错误状态，返回的视图携带错误信息
pub struct GenerateStoryHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    generation_client: Arc<GenerationClient>,
    default_prompt: String,
}

impl GenerateStoryHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        generation_client: Arc<GenerationClient>,
        default_prompt: impl Into<String>,
    ) -> Self {
        Self {
            session_manager,
            generation_client,
            default_prompt: default_prompt.into(),
        }
    }

    pub async fn handle(&self, cmd: GenerateStoryCommand) -> Result<SlideView, ApplicationError> {
        let prompt = cmd
            .prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.default_prompt.clone());

        self.session_manager.begin_generation(&cmd.session_id)?;

        tracing::info!(
            session_id = %cmd.session_id,
            prompt_len = prompt.len(),
            slide_count = self.generation_client.slide_count(),
            "Story generation started"
        );

        // 生成与结果写回在独立任务中完成，请求被取消时结果仍会写回会话
        let session_manager = self.session_manager.clone();
        let generation_client = self.generation_client.clone();
        let session_id = cmd.session_id.clone();
        let task = tokio::spawn(async move {
            let outcome = generation_client.generate(&prompt).await;
            match &outcome {
                Ok(story) => tracing::info!(
                    session_id = %session_id,
                    slides = story.len(),
                    "Story generation completed"
                ),
                Err(e) => tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Story generation failed"
                ),
            }
            session_manager.finish_generation(&session_id, outcome.map_err(|e| e.to_string()))
        });

        match task.await {
            Ok(view) => Ok(view?),
            Err(e) => {
                tracing::error!(session_id = %cmd.session_id, error = %e, "Story generation task aborted");
                self.session_manager
                    .finish_generation(&cmd.session_id, Err("Story generation aborted".to_string()))?;
                Err(ApplicationError::internal(format!("Story generation task aborted: {}", e)))
            }
        }
    }
}

/// LoadStory Handler - 从故事库加载故事到会话
pub struct LoadStoryHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    library: Arc<dyn StoryLibraryPort>,
    slide_count: usize,
    asset_prefix: String,
}

impl LoadStoryHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        library: Arc<dyn StoryLibraryPort>,
        slide_count: usize,
        asset_prefix: impl Into<String>,
    ) -> Self {
        Self {
            session_manager,
            library,
            slide_count,
            asset_prefix: asset_prefix.into(),
        }
    }

    pub async fn handle(&self, cmd: LoadStoryCommand) -> Result<SlideView, ApplicationError> {
        if !self.session_manager.is_valid(&cmd.session_id) {
            return Err(ApplicationError::not_found("Session", cmd.session_id));
        }

        let library_story = self.library.read(&cmd.story_name).await?;
        let slides = library_slides(&library_story, self.slide_count, &self.asset_prefix)
            .into_iter()
            .filter(|s| !s.paragraph().is_empty())
            .collect();

        let story = Story::new(slides)
            .map_err(|e| ApplicationError::validation(format!("{}: {}", cmd.story_name, e)))?
            .with_title(extract_title(&library_story.text));

        let view = self.session_manager.load_story(&cmd.session_id, story)?;

        tracing::info!(
            session_id = %cmd.session_id,
            story = %cmd.story_name,
            slides = view.total,
            "Library story loaded"
        );

        Ok(view)
    }
}

/// Navigate Handler - 上一张 / 下一张
pub struct NavigateHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl NavigateHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub fn handle(&self, cmd: NavigateCommand) -> Result<SlideView, ApplicationError> {
        let view = match cmd.direction {
            Direction::Next => self.session_manager.next(&cmd.session_id)?,
            Direction::Previous => self.session_manager.previous(&cmd.session_id)?,
        };

        tracing::debug!(
            session_id = %cmd.session_id,
            direction = ?cmd.direction,
            index = view.index,
            total = view.total,
            "Slide navigated"
        );

        Ok(view)
    }
}

/// CloseSession Handler - 关闭会话
pub struct CloseSessionHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl CloseSessionHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub fn handle(&self, cmd: CloseSessionCommand) -> Result<CloseSessionResponse, ApplicationError> {
        self.session_manager.close(&cmd.session_id)?;
        Ok(CloseSessionResponse {
            session_id: cmd.session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::ports::BackendError;
    use crate::domain::slideshow::ViewState;
    use crate::infrastructure::adapters::{FakeBackend, FileStoryLibrary};
    use crate::infrastructure::memory::InMemorySessionManager;

    const STORY: &str = "The moon yawned over the hills. A small rabbit counted the stars. \
                         Each star blinked goodnight. The rabbit curled up in the soft grass.";

    fn sessions() -> Arc<dyn SessionManagerPort> {
        Arc::new(InMemorySessionManager::new())
    }

    fn generate_handler(
        sessions: Arc<dyn SessionManagerPort>,
        backend: FakeBackend,
    ) -> GenerateStoryHandler {
        let client = Arc::new(GenerationClient::new(Arc::new(backend), 4));
        GenerateStoryHandler::new(sessions, client, "a bedtime story")
    }

    fn open(sessions: &Arc<dyn SessionManagerPort>) -> String {
        OpenSessionHandler::new(sessions.clone())
            .handle(OpenSessionCommand)
            .unwrap()
            .session_id
    }

    #[tokio::test]
    async fn test_generate_loads_story_at_first_slide() {
        let sessions = sessions();
        let id = open(&sessions);
        let handler = generate_handler(sessions.clone(), FakeBackend::new(STORY));

        let view = handler
            .handle(GenerateStoryCommand {
                session_id: id.clone(),
                prompt: Some("a rabbit".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(view.state, ViewState::Loaded);
        assert_eq!(view.index, 0);
        assert_eq!(view.total, 4);
        assert!(!view.can_previous);
        assert!(view.can_next);
        assert!(view.can_generate);
    }

    #[tokio::test]
    async fn test_upstream_failure_enters_error_state() {
        let sessions = sessions();
        let id = open(&sessions);
        let backend = FakeBackend::failing_story(BackendError::Rejected {
            status: 500,
            message: "Internal Server Error: Failed to generate story.".to_string(),
        });
        let handler = generate_handler(sessions.clone(), backend);

        let view = handler
            .handle(GenerateStoryCommand {
                session_id: id.clone(),
                prompt: None,
            })
            .await
            .unwrap();

        assert_eq!(view.state, ViewState::Failed);
        assert!(view.slide.is_none());
        assert!(view.error.unwrap().contains("Failed to generate story"));
        assert!(view.can_generate);
        assert!(!view.can_previous && !view.can_next);
    }

    #[tokio::test]
    async fn test_empty_story_reports_error() {
        let sessions = sessions();
        let id = open(&sessions);
        let handler = generate_handler(sessions.clone(), FakeBackend::new(""));

        let view = handler
            .handle(GenerateStoryCommand {
                session_id: id,
                prompt: None,
            })
            .await
            .unwrap();

        assert_eq!(view.state, ViewState::Failed);
        assert_eq!(view.error.as_deref(), Some("Generated story is empty"));
    }

    #[tokio::test]
    async fn test_overlapping_generation_is_rejected() {
        let sessions = sessions();
        let id = open(&sessions);
        sessions.begin_generation(&id).unwrap();

        let handler = generate_handler(sessions.clone(), FakeBackend::new(STORY));
        let err = handler
            .handle(GenerateStoryCommand {
                session_id: id,
                prompt: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::BusinessRuleViolation(_)));
    }

    #[tokio::test]
    async fn test_dropped_request_still_finishes_generation() {
        let sessions = sessions();
        let id = open(&sessions);
        let backend = FakeBackend::new(STORY).with_story_delay(Duration::from_millis(200));
        let handler = generate_handler(sessions.clone(), backend);

        let dropped = tokio::time::timeout(
            Duration::from_millis(20),
            handler.handle(GenerateStoryCommand {
                session_id: id.clone(),
                prompt: None,
            }),
        )
        .await;
        assert!(dropped.is_err());
        assert!(sessions.render(&id).unwrap().generating);

        let mut view = sessions.render(&id).unwrap();
        for _ in 0..50 {
            if !view.generating {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            view = sessions.render(&id).unwrap();
        }

        assert!(!view.generating);
        assert!(view.can_generate);
        assert_eq!(view.state, ViewState::Loaded);
        assert!(sessions.begin_generation(&id).is_ok());
    }

    #[tokio::test]
    async fn test_navigation_is_bounded() {
        let sessions = sessions();
        let id = open(&sessions);
        generate_handler(sessions.clone(), FakeBackend::new(STORY))
            .handle(GenerateStoryCommand {
                session_id: id.clone(),
                prompt: None,
            })
            .await
            .unwrap();

        let navigate = NavigateHandler::new(sessions.clone());
        let step = |direction| {
            navigate
                .handle(NavigateCommand {
                    session_id: id.clone(),
                    direction,
                })
                .unwrap()
        };

        assert_eq!(step(Direction::Previous).index, 0);
        for _ in 0..10 {
            step(Direction::Next);
        }
        let view = step(Direction::Next);
        assert_eq!(view.index, 3);
        assert!(!view.can_next);
        assert_eq!(view.counter, "4 / 4");
    }

    #[test]
    fn test_navigation_without_story_is_invalid() {
        let sessions = sessions();
        let id = open(&sessions);
        let err = NavigateHandler::new(sessions)
            .handle(NavigateCommand {
                session_id: id,
                direction: Direction::Next,
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_load_library_story() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("sleepy_rabbit");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("story.txt"), format!("Title: Sleepy Rabbit\n{}", STORY)).unwrap();
        for i in 1..=4 {
            std::fs::write(folder.join(format!("image_{}.png", i)), b"png").unwrap();
        }

        let sessions = sessions();
        let id = open(&sessions);
        let library = Arc::new(FileStoryLibrary::new(dir.path(), 4));
        let handler = LoadStoryHandler::new(sessions.clone(), library, 4, "/story_assets");

        let view = handler
            .handle(LoadStoryCommand {
                session_id: id,
                story_name: "sleepy_rabbit".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(view.state, ViewState::Loaded);
        assert_eq!(view.total, 4);
        assert_eq!(view.title.as_deref(), Some("Sleepy Rabbit"));
        assert_eq!(
            view.slide.unwrap().image().as_str(),
            "/story_assets/sleepy_rabbit/image_1.png"
        );
    }

    #[test]
    fn test_close_session() {
        let sessions = sessions();
        let id = open(&sessions);
        CloseSessionHandler::new(sessions.clone())
            .handle(CloseSessionCommand {
                session_id: id.clone(),
            })
            .unwrap();
        assert!(!sessions.is_valid(&id));
    }
}
