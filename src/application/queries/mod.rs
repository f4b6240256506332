//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：读取放映状态与故事库

mod library_queries;
mod slideshow_queries;

pub mod handlers;

pub use library_queries::*;
pub use slideshow_queries::*;
