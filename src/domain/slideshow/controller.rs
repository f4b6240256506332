//! Slideshow Controller - 放映状态机
//!
//! 状态: Empty → Loaded(position)，生成失败进入 Failed
//!
//! 不变量:
//! - Loaded 时 0 <= position < story.len()
//! - 故事整体替换，不做局部修改
//! - 同一时间最多一个生成请求

use serde::Serialize;
use thiserror::Error;

use super::narrator::{narrator_for, NarrationCue};
use crate::domain::story::{Slide, Story};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlideshowError {
    #[error("No story loaded")]
    NoStory,

    #[error("A story is already being generated")]
    GenerationInProgress,
}

/// 放映状态
#[derive(Debug, Clone, Default)]
pub enum SlideshowState {
    /// 尚未加载故事
    #[default]
    Empty,
    /// 已加载故事，position 为当前幻灯片索引
    Loaded { story: Story, position: usize },
    /// 最近一次生成失败，隐藏放映内容并显示错误
    Failed { message: String },
}

/// 视图状态标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Empty,
    Loaded,
    Failed,
}

/// 渲染结果
///
/// 导航按钮的可用状态由 position == 0 与 position == total - 1 推导
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideView {
    pub state: ViewState,
    pub generating: bool,
    pub can_generate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub slide: Option<Slide>,
    pub index: usize,
    pub total: usize,
    pub counter: String,
    pub can_previous: bool,
    pub can_next: bool,
    pub narration: Option<NarrationCue>,
}

/// 放映控制器
///
/// 显式持有当前故事与位置，由会话管理器按会话保存
#[derive(Debug, Clone, Default)]
pub struct SlideshowController {
    state: SlideshowState,
    generating: bool,
}

impl SlideshowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SlideshowState {
        &self.state
    }

    pub fn story(&self) -> Option<&Story> {
        match &self.state {
            SlideshowState::Loaded { story, .. } => Some(story),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match &self.state {
            SlideshowState::Loaded { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// 加载故事并回到第一张，替换之前的任何故事
    pub fn load_story(&mut self, story: Story) {
        self.state = SlideshowState::Loaded { story, position: 0 };
    }

    /// 下一张；已在最后一张时不变
    pub fn next(&mut self) -> Result<usize, SlideshowError> {
        match &mut self.state {
            SlideshowState::Loaded { story, position } => {
                if *position + 1 < story.len() {
                    *position += 1;
                }
                Ok(*position)
            }
            _ => Err(SlideshowError::NoStory),
        }
    }

    /// 上一张；已在第一张时不变
    pub fn previous(&mut self) -> Result<usize, SlideshowError> {
        match &mut self.state {
            SlideshowState::Loaded { position, .. } => {
                if *position > 0 {
                    *position -= 1;
                }
                Ok(*position)
            }
            _ => Err(SlideshowError::NoStory),
        }
    }

    /// 标记生成开始；已有生成进行中时拒绝
    pub fn begin_generation(&mut self) -> Result<(), SlideshowError> {
        if self.generating {
            return Err(SlideshowError::GenerationInProgress);
        }
        self.generating = true;
        Ok(())
    }

    /// 结束生成：成功则加载故事，失败则进入错误状态；总是释放生成标记
    pub fn finish_generation(&mut self, outcome: Result<Story, String>) {
        self.generating = false;
        match outcome {
            Ok(story) => self.load_story(story),
            Err(message) => self.state = SlideshowState::Failed { message },
        }
    }

    /// 渲染当前状态
    pub fn render(&self) -> SlideView {
        let mut view = SlideView {
            state: ViewState::Empty,
            generating: self.generating,
            can_generate: !self.generating,
            error: None,
            title: None,
            slide: None,
            index: 0,
            total: 0,
            counter: String::new(),
            can_previous: false,
            can_next: false,
            narration: None,
        };

        match &self.state {
            SlideshowState::Empty => {}
            SlideshowState::Failed { message } => {
                view.state = ViewState::Failed;
                view.error = Some(message.clone());
            }
            SlideshowState::Loaded { story, position } => {
                let position = *position;
                let total = story.len();
                view.state = ViewState::Loaded;
                view.title = story.title().map(str::to_string);
                view.index = position;
                view.total = total;
                view.counter = format!("{} / {}", position + 1, total);
                view.can_previous = position > 0;
                view.can_next = position + 1 < total;
                if let Some(slide) = story.slide(position) {
                    view.narration = narrator_for(slide.audio()).speak(slide.paragraph());
                    view.slide = Some(slide.clone());
                }
            }
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::{ImageRef, Narration};

    fn story(len: usize) -> Story {
        let slides = (0..len)
            .map(|i| Slide::new(format!("part {}", i + 1), ImageRef::placeholder(), None))
            .collect();
        Story::new(slides).unwrap()
    }

    fn loaded(len: usize) -> SlideshowController {
        let mut controller = SlideshowController::new();
        controller.load_story(story(len));
        controller
    }

    #[test]
    fn test_starts_empty() {
        let controller = SlideshowController::new();
        let view = controller.render();
        assert_eq!(view.state, ViewState::Empty);
        assert!(view.slide.is_none());
        assert!(!view.can_previous && !view.can_next);
        assert!(view.can_generate);
    }

    #[test]
    fn test_navigation_requires_story() {
        let mut controller = SlideshowController::new();
        assert_eq!(controller.next(), Err(SlideshowError::NoStory));
        assert_eq!(controller.previous(), Err(SlideshowError::NoStory));
    }

    #[test]
    fn test_load_starts_at_first_slide() {
        let controller = loaded(3);
        assert_eq!(controller.position(), Some(0));
        let view = controller.render();
        assert_eq!(view.counter, "1 / 3");
        assert!(!view.can_previous);
        assert!(view.can_next);
    }

    #[test]
    fn test_previous_at_first_is_noop() {
        let mut controller = loaded(3);
        assert_eq!(controller.previous(), Ok(0));
        assert_eq!(controller.position(), Some(0));
    }

    #[test]
    fn test_next_at_last_is_noop() {
        let mut controller = loaded(2);
        assert_eq!(controller.next(), Ok(1));
        assert_eq!(controller.next(), Ok(1));
        let view = controller.render();
        assert!(view.can_previous);
        assert!(!view.can_next);
        assert_eq!(view.slide.unwrap().paragraph(), "part 2");
    }

    #[test]
    fn test_both_enabled_in_middle() {
        let mut controller = loaded(3);
        controller.next().unwrap();
        let view = controller.render();
        assert_eq!(view.index, 1);
        assert!(view.can_previous && view.can_next);
    }

    #[test]
    fn test_single_slide_disables_both() {
        let view = loaded(1).render();
        assert!(!view.can_previous && !view.can_next);
    }

    #[test]
    fn test_reload_resets_position() {
        let mut controller = loaded(4);
        controller.next().unwrap();
        controller.next().unwrap();
        controller.load_story(story(2));
        assert_eq!(controller.position(), Some(0));
        assert_eq!(controller.story().unwrap().len(), 2);
    }

    #[test]
    fn test_generation_guard() {
        let mut controller = SlideshowController::new();
        controller.begin_generation().unwrap();
        assert!(!controller.render().can_generate);
        assert_eq!(
            controller.begin_generation(),
            Err(SlideshowError::GenerationInProgress)
        );
        controller.finish_generation(Ok(story(2)));
        assert!(!controller.is_generating());
        assert_eq!(controller.position(), Some(0));
    }

    #[test]
    fn test_failed_generation_shows_error_and_reenables_generate() {
        let mut controller = loaded(3);
        controller.begin_generation().unwrap();
        controller.finish_generation(Err("upstream failed".to_string()));

        let view = controller.render();
        assert_eq!(view.state, ViewState::Failed);
        assert_eq!(view.error.as_deref(), Some("upstream failed"));
        assert!(view.slide.is_none());
        assert!(!view.can_previous && !view.can_next);
        assert!(view.can_generate);
        assert_eq!(controller.next(), Err(SlideshowError::NoStory));
    }

    #[test]
    fn test_render_carries_narration_cue() {
        let slide = Slide::new(
            "The moon hums softly.",
            ImageRef::placeholder(),
            Some(Narration::Speech("The moon hums softly.".to_string())),
        );
        let mut controller = SlideshowController::new();
        controller.load_story(Story::new(vec![slide]).unwrap());
        assert_eq!(
            controller.render().narration,
            Some(NarrationCue::Speak {
                text: "The moon hums softly.".to_string()
            })
        );
    }
}
