//! HTTP Layer - RESTful API
//!
//! 生成端点（透传）、放映会话 API、故事库 API 与静态资源

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, StatusError};
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::{AppState, SlideshowSettings};
