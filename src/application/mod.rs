//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（GenerationApi、StoryBackend、StoryLibrary、SessionManager）
//! - services: 透传服务与故事生成客户端
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod services;

// Re-exports
pub use commands::{
    CloseSessionCommand,
    CloseSessionResponse,
    Direction,
    GenerateStoryCommand,
    LoadStoryCommand,
    NavigateCommand,
    OpenSessionCommand,
    OpenSessionResponse,
    // Handlers
    handlers::{
        CloseSessionHandler, GenerateStoryHandler, LoadStoryHandler, NavigateHandler,
        OpenSessionHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Generation API
    ChatRequest,
    GenerationApiPort,
    ImageRequest,
    UpstreamError,
    // Story backend
    BackendError,
    StoryBackendPort,
    // Story library
    LibraryError,
    LibraryStory,
    StoryLibraryPort,
    // Session manager
    SessionError,
    SessionManagerPort,
    SlideshowSession,
};

pub use queries::{
    GetCurrentSlide,
    GetLibraryStory,
    LibraryStoryView,
    ListStories,
    // Handlers
    handlers::{library_slides, GetCurrentSlideHandler, GetLibraryStoryHandler, ListStoriesHandler},
};

pub use services::{
    GenerationClient, GenerationError, PassthroughError, PassthroughService, PassthroughSettings,
};
