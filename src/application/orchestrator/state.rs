//! 交互状态机与会话视图

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ports::SessionState;
use crate::domain::synthesis::{AudioArtifact, OutputFormat, DOWNLOAD_FILE_NAME, MAX_TEXT_CHARS};
use crate::domain::voice::{Engine, Voice};

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 客户端构建失败
    Client,
    /// 音色目录为空或拉取失败
    Catalog,
}

/// 会话交互状态
///
/// Idle → VoicesLoading → VoicesReady → Synthesizing → ArtifactReady，
/// Failed 只能由手动 retry 离开
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "name", content = "kind")]
pub enum InteractionState {
    Idle,
    VoicesLoading,
    VoicesReady,
    Synthesizing,
    ArtifactReady,
    Failed(FailureKind),
}

impl InteractionState {
    /// 目录已就绪，可以选择音色和提交
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::VoicesReady | Self::ArtifactReady)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// 用户可见提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// 下拉框选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub id: String,
    pub label: String,
    pub language_code: String,
    pub gender: String,
}

impl From<&Voice> for VoiceOption {
    fn from(voice: &Voice) -> Self {
        Self {
            id: voice.id().as_str().to_string(),
            label: voice.label(),
            language_code: voice.language_code().as_str().to_string(),
            gender: voice.gender().as_str().to_string(),
        }
    }
}

/// 音频产物摘要（字节通过 /api/audio 读取）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub size_bytes: usize,
    pub mime_type: &'static str,
    pub file_name: &'static str,
    pub voice_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AudioArtifact> for ArtifactInfo {
    fn from(artifact: &AudioArtifact) -> Self {
        Self {
            size_bytes: artifact.len(),
            mime_type: artifact.mime_type(),
            file_name: DOWNLOAD_FILE_NAME,
            voice_id: artifact.voice_id().as_str().to_string(),
            created_at: artifact.created_at(),
        }
    }
}

/// 会话视图：UI 重新渲染所需的全部数据
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub state: InteractionState,
    pub voices: Vec<VoiceOption>,
    pub selected_voice_id: Option<String>,
    pub artifact: Option<ArtifactInfo>,
    pub show_welcome: bool,
    pub notices: Vec<Notice>,
    pub can_submit: bool,
    pub submit_max_chars: usize,
    pub engine: &'static str,
    pub output_format: &'static str,
}

impl SessionView {
    pub fn from_state(state: &SessionState) -> Self {
        let voices = state
            .voice_catalog
            .as_ref()
            .map(|snapshot| snapshot.voices.iter().map(VoiceOption::from).collect())
            .unwrap_or_default();

        Self {
            session_id: state.id.clone(),
            state: state.interaction,
            voices,
            selected_voice_id: state.selected_voice.as_ref().map(|v| v.as_str().to_string()),
            artifact: state.results.get().map(ArtifactInfo::from),
            show_welcome: !state.has_shown_welcome,
            notices: state.notices.clone(),
            can_submit: state.interaction.is_ready() && state.selected_voice.is_some(),
            submit_max_chars: MAX_TEXT_CHARS,
            engine: Engine::Neural.label(),
            output_format: OutputFormat::Mp3.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CatalogSnapshot;
    use crate::domain::voice::VoiceId;
    use bytes::Bytes;
    use uuid::Uuid;

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(InteractionState::VoicesReady).unwrap();
        assert_eq!(json["name"], "voices_ready");

        let json = serde_json::to_value(InteractionState::Failed(FailureKind::Catalog)).unwrap();
        assert_eq!(json["name"], "failed");
        assert_eq!(json["kind"], "catalog");
    }

    #[test]
    fn test_fresh_session_view() {
        let state = SessionState::new();
        let view = SessionView::from_state(&state);

        assert_eq!(view.state, InteractionState::Idle);
        assert!(view.voices.is_empty());
        assert!(view.show_welcome);
        assert!(!view.can_submit);
        assert_eq!(view.submit_max_chars, 3000);
        assert_eq!(view.engine, "Neural");
        assert_eq!(view.output_format, "MP3");
    }

    #[test]
    fn test_view_reflects_catalog_and_artifact() {
        let mut state = SessionState::new();
        let voice = Voice::from_provider_fields("Joanna", "Joanna", "en-US", "Female").unwrap();
        state.voice_catalog = Some(CatalogSnapshot::new(Uuid::new_v4(), vec![voice]));
        state.selected_voice = Some(VoiceId::new("Joanna").unwrap());
        state.interaction = InteractionState::ArtifactReady;
        state.results.set(AudioArtifact::new(
            Bytes::from_static(b"ID3"),
            VoiceId::new("Joanna").unwrap(),
        ));

        let view = SessionView::from_state(&state);
        assert_eq!(view.voices[0].label, "Joanna (en-US - Female)");
        assert_eq!(view.selected_voice_id.as_deref(), Some("Joanna"));
        assert!(view.can_submit);

        let artifact = view.artifact.unwrap();
        assert_eq!(artifact.size_bytes, 3);
        assert_eq!(artifact.mime_type, "audio/mp3");
        assert_eq!(artifact.file_name, "polly_output.mp3");
    }
}
