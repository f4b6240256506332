//! Slideshow Queries

/// 获取当前幻灯片
#[derive(Debug, Clone)]
pub struct GetCurrentSlide {
    pub session_id: String,
}
