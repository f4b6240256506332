//! 应用服务
//!
//! - passthrough: 三个生成端点背后的透传逻辑（提示词模板、字段校验、占位降级）
//! - generation_client: 把故事正文切分为幻灯片并逐张补齐插图与旁白

mod generation_client;
mod passthrough;

pub use generation_client::{GenerationClient, GenerationError};
pub use passthrough::{
    illustration_prompt, story_system_prompt, PassthroughError, PassthroughService,
    PassthroughSettings, MAX_IMAGE_PROMPT_CHARS,
};
