//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 音色唯一标识（Provider 侧的 VoiceId，如 "Joanna"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Result<Self, VoiceError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(VoiceError::InvalidId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 支持的语言（封闭白名单，不做语言协商）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
}

/// 目标语言集合
pub const TARGET_LANGUAGES: [LanguageCode; 2] = [LanguageCode::EnUs, LanguageCode::EnGb];

impl LanguageCode {
    /// 解析 Provider 返回的语言代码，不在白名单内返回 None
    pub fn parse(code: &str) -> Option<Self> {
        TARGET_LANGUAGES.into_iter().find(|lang| lang.as_str() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 音色性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Female" => Some(Self::Female),
            "Male" => Some(Self::Male),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 合成引擎档位，固定为 neural
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Neural,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neural => "neural",
        }
    }

    /// UI 展示用名称
    pub fn label(&self) -> &'static str {
        match self {
            Self::Neural => "Neural",
        }
    }
}
