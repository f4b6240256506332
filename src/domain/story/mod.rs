//! Story Context - 故事限界上下文
//!
//! 职责:
//! - 故事聚合（有序幻灯片集合）
//! - 插图引用与旁白标记值对象
//! - 故事标题提取与目录名规范化

mod entities;
mod errors;
mod title;
mod value_objects;

pub use entities::{Slide, Story};
pub use errors::StoryError;
pub use title::{extract_title, folder_name_for};
pub use value_objects::{ImageRef, Narration, PLACEHOLDER_IMAGE};
