//! Storytime - 睡前故事幻灯片系统
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story Context: 故事、幻灯片、插图与旁白
//! - Slideshow Context: 放映状态机与旁白选择
//! - 文本切分: 故事正文按幻灯片数量切段
//!
//! 应用层 (application/):
//! - Ports: 端口定义（GenerationApi, StoryBackend, StoryLibrary, SessionManager）
//! - Services: 生成端点透传逻辑、故事生成客户端
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 生成端点 + 放映会话 API + 故事库
//! - Memory: SessionManager 内存实现
//! - Worker: 会话 GC
//! - Adapters: OpenAI Client, Story Backend, File Story Library

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
