//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod generation_api;
mod session_manager;
mod story_backend;
mod story_library;

pub use generation_api::{ChatRequest, GenerationApiPort, ImageRequest, UpstreamError};
pub use session_manager::{SessionError, SessionManagerPort, SlideshowSession};
pub use story_backend::{BackendError, StoryBackendPort};
pub use story_library::{LibraryError, LibraryStory, StoryLibraryPort};
