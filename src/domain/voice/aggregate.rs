//! Voice Context - Aggregate Root

use serde::Serialize;

use super::{Engine, Gender, LanguageCode, VoiceError, VoiceId};

/// Voice 聚合根
///
/// 不变量:
/// - language_code 必须在 TARGET_LANGUAGES 内
/// - engine 固定为 neural
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    id: VoiceId,
    display_name: String,
    language_code: LanguageCode,
    gender: Gender,
    engine: Engine,
}

impl Voice {
    pub fn new(
        id: VoiceId,
        display_name: impl Into<String>,
        language_code: LanguageCode,
        gender: Gender,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            language_code,
            gender,
            engine: Engine::Neural,
        }
    }

    /// 从 Provider 返回的原始字段构建
    ///
    /// 语言不在白名单内或性别无法识别时返回错误
    pub fn from_provider_fields(
        id: &str,
        name: &str,
        language_code: &str,
        gender: &str,
    ) -> Result<Self, VoiceError> {
        let language = LanguageCode::parse(language_code)
            .ok_or_else(|| VoiceError::UnsupportedLanguage(language_code.to_string()))?;
        let gender =
            Gender::parse(gender).ok_or_else(|| VoiceError::UnsupportedGender(gender.to_string()))?;
        Ok(Self::new(VoiceId::new(id)?, name, language, gender))
    }

    /// 下拉框标签，如 "Joanna (en-US - Female)"
    pub fn label(&self) -> String {
        format!(
            "{} ({} - {})",
            self.display_name, self.language_code, self.gender
        )
    }

    // Getters
    pub fn id(&self) -> &VoiceId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn language_code(&self) -> LanguageCode {
        self.language_code
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }
}
