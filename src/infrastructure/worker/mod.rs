//! Worker Layer - Background Task Processing
//!
//! 实现 SessionGcWorker，定期回收空闲放映会话

mod session_gc;

pub use session_gc::{SessionGcConfig, SessionGcWorker};
