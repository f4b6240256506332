//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CloseSessionHandler, GenerateStoryHandler, LoadStoryHandler, NavigateHandler,
    OpenSessionHandler,
    // Query handlers
    GetCurrentSlideHandler, GetLibraryStoryHandler, ListStoriesHandler,
    // Services
    GenerationClient, PassthroughService,
    // Ports
    SessionManagerPort, StoryLibraryPort,
};

/// 放映相关设置
#[derive(Debug, Clone)]
pub struct SlideshowSettings {
    /// 每个故事的幻灯片数量
    pub slide_count: usize,
    /// 未提供提示词时使用的默认提示词
    pub default_prompt: String,
    /// 故事库静态资源的 URL 前缀
    pub asset_prefix: String,
}

impl Default for SlideshowSettings {
    fn default() -> Self {
        Self {
            slide_count: 5,
            default_prompt: "A gentle bedtime story about a sleepy animal".to_string(),
            asset_prefix: "/story_assets".to_string(),
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Ports & Services ==========
    pub session_manager: Arc<dyn SessionManagerPort>,
    pub library: Arc<dyn StoryLibraryPort>,
    pub passthrough: Arc<PassthroughService>,

    // ========== Command Handlers ==========
    pub open_session_handler: OpenSessionHandler,
    pub generate_story_handler: GenerateStoryHandler,
    pub load_story_handler: LoadStoryHandler,
    pub navigate_handler: NavigateHandler,
    pub close_session_handler: CloseSessionHandler,

    // ========== Query Handlers ==========
    pub get_current_slide_handler: GetCurrentSlideHandler,
    pub list_stories_handler: ListStoriesHandler,
    pub get_library_story_handler: GetLibraryStoryHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        library: Arc<dyn StoryLibraryPort>,
        passthrough: Arc<PassthroughService>,
        generation_client: Arc<GenerationClient>,
        settings: SlideshowSettings,
    ) -> Self {
        Self {
            session_manager: session_manager.clone(),
            library: library.clone(),
            passthrough,

            // Command handlers
            open_session_handler: OpenSessionHandler::new(session_manager.clone()),
            generate_story_handler: GenerateStoryHandler::new(
                session_manager.clone(),
                generation_client,
                settings.default_prompt.clone(),
            ),
            load_story_handler: LoadStoryHandler::new(
                session_manager.clone(),
                library.clone(),
                settings.slide_count,
                settings.asset_prefix.clone(),
            ),
            navigate_handler: NavigateHandler::new(session_manager.clone()),
            close_session_handler: CloseSessionHandler::new(session_manager.clone()),

            // Query handlers
            get_current_slide_handler: GetCurrentSlideHandler::new(session_manager),
            list_stories_handler: ListStoriesHandler::new(library.clone()),
            get_library_story_handler: GetLibraryStoryHandler::new(
                library,
                settings.slide_count,
                settings.asset_prefix,
            ),
        }
    }
}
