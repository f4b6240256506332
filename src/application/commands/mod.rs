//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：改变放映会话状态的操作

mod slideshow_commands;

pub mod handlers;

pub use slideshow_commands::*;
