//! Synthesis Context - Value Objects

use serde::Serialize;

use super::SynthesisTextError;
use crate::domain::voice::{Engine, VoiceId};

/// 单次合成的最大字符数（按字符计，不按字节）
pub const MAX_TEXT_CHARS: usize = 3000;

/// 待合成文本
///
/// 不变量:
/// - trim 后非空
/// - 字符数不超过 MAX_TEXT_CHARS
/// - 保存原文，不做 trim，按用户输入原样发送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisText(String);

impl SynthesisText {
    pub fn new(text: impl Into<String>) -> Result<Self, SynthesisTextError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SynthesisTextError::Empty);
        }
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(SynthesisTextError::TooLong {
                chars,
                max: MAX_TEXT_CHARS,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// 输出格式，固定 mp3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp3,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mp3",
        }
    }

    /// UI 展示用名称
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mp3 => "MP3",
        }
    }
}

/// 文本类型，固定为纯文本（不解析 SSML）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    #[default]
    Plain,
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    text: SynthesisText,
    voice_id: VoiceId,
    engine: Engine,
    output_format: OutputFormat,
    text_type: TextType,
}

impl SynthesisRequest {
    pub fn new(text: SynthesisText, voice_id: VoiceId) -> Self {
        Self {
            text,
            voice_id,
            engine: Engine::Neural,
            output_format: OutputFormat::Mp3,
            text_type: TextType::Plain,
        }
    }

    pub fn text(&self) -> &SynthesisText {
        &self.text
    }

    pub fn voice_id(&self) -> &VoiceId {
        &self.voice_id
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn text_type(&self) -> TextType {
        self.text_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_rejected() {
        assert_eq!(SynthesisText::new(""), Err(SynthesisTextError::Empty));
        assert_eq!(SynthesisText::new(" \n\t "), Err(SynthesisTextError::Empty));
    }

    #[test]
    fn test_length_counted_in_chars() {
        // 3000 个多字节字符仍然合法
        let text = "é".repeat(MAX_TEXT_CHARS);
        assert!(text.len() > MAX_TEXT_CHARS);
        assert_eq!(SynthesisText::new(text).unwrap().char_count(), MAX_TEXT_CHARS);

        let too_long = "a".repeat(MAX_TEXT_CHARS + 1);
        assert_eq!(
            SynthesisText::new(too_long),
            Err(SynthesisTextError::TooLong {
                chars: MAX_TEXT_CHARS + 1,
                max: MAX_TEXT_CHARS
            })
        );
    }

    #[test]
    fn test_text_kept_verbatim() {
        let text = SynthesisText::new("  <speak>hi</speak> ").unwrap();
        assert_eq!(text.as_str(), "  <speak>hi</speak> ");
    }

    #[test]
    fn test_request_fixed_parameters() {
        let request = SynthesisRequest::new(
            SynthesisText::new("Hello world").unwrap(),
            VoiceId::new("Joanna").unwrap(),
        );
        assert_eq!(request.engine(), Engine::Neural);
        assert_eq!(request.output_format(), OutputFormat::Mp3);
        assert_eq!(request.text_type(), TextType::Plain);
    }
}
