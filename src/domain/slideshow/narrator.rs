//! 旁白能力
//!
//! 根据幻灯片是否携带旁白数据选择实现

use serde::Serialize;

use crate::domain::story::Narration;

/// 交给播放端执行的旁白指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NarrationCue {
    /// 使用端侧语音合成朗读
    Speak { text: String },
    /// 播放预渲染音频
    Play { url: String },
}

/// 旁白能力接口
pub trait Narrator: Send + Sync {
    /// 朗读一段文本，返回播放端需要执行的指令；不朗读时返回 None
    fn speak(&self, text: &str) -> Option<NarrationCue>;
}

/// 基于旁白数据的语音朗读
pub struct TextToSpeechNarrator {
    narration: Narration,
}

impl TextToSpeechNarrator {
    pub fn new(narration: Narration) -> Self {
        Self { narration }
    }
}

impl Narrator for TextToSpeechNarrator {
    fn speak(&self, text: &str) -> Option<NarrationCue> {
        match &self.narration {
            Narration::Speech(marker) if marker.trim().is_empty() => Some(NarrationCue::Speak {
                text: text.to_string(),
            }),
            Narration::Speech(marker) => Some(NarrationCue::Speak {
                text: marker.clone(),
            }),
            Narration::Clip(url) => Some(NarrationCue::Play { url: url.clone() }),
        }
    }
}

/// 无旁白
pub struct NoOpNarrator;

impl Narrator for NoOpNarrator {
    fn speak(&self, _text: &str) -> Option<NarrationCue> {
        None
    }
}

/// 按旁白数据是否存在选择实现
pub fn narrator_for(audio: Option<&Narration>) -> Box<dyn Narrator> {
    match audio {
        Some(narration) => Box::new(TextToSpeechNarrator::new(narration.clone())),
        None => Box::new(NoOpNarrator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_narration_is_silent() {
        assert_eq!(narrator_for(None).speak("Goodnight"), None);
    }

    #[test]
    fn test_speech_marker_is_spoken() {
        let narration = Narration::Speech("Goodnight, little star".to_string());
        assert_eq!(
            narrator_for(Some(&narration)).speak("ignored"),
            Some(NarrationCue::Speak {
                text: "Goodnight, little star".to_string()
            })
        );
    }

    #[test]
    fn test_blank_speech_marker_reads_slide_text() {
        let narration = Narration::Speech(String::new());
        assert_eq!(
            TextToSpeechNarrator::new(narration).speak("slide text"),
            Some(NarrationCue::Speak {
                text: "slide text".to_string()
            })
        );
    }

    #[test]
    fn test_clip_marker_is_played() {
        let narration = Narration::Clip("https://cdn.example/1.mp3".to_string());
        assert_eq!(
            narrator_for(Some(&narration)).speak("text"),
            Some(NarrationCue::Play {
                url: "https://cdn.example/1.mp3".to_string()
            })
        );
    }
}
