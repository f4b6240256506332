//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Story Context: 故事与幻灯片
//! - Slideshow Context: 放映状态机与旁白

pub mod slideshow;
pub mod story;

// 故事正文切分
mod text_partitioner;

pub use text_partitioner::partition;
