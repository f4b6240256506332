//! Slideshow Context - 幻灯片放映上下文
//!
//! 职责:
//! - 当前故事与放映位置的状态机
//! - 生成中防重入标记
//! - 旁白能力抽象（语音合成 / 静音）

mod controller;
mod narrator;

pub use controller::{SlideView, SlideshowController, SlideshowError, SlideshowState, ViewState};
pub use narrator::{narrator_for, NarrationCue, Narrator, NoOpNarrator, TextToSpeechNarrator};
