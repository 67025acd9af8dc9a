//! Synthesis Commands - 音色选择与合成

/// 选择音色，voice_id 必须在当前目录中
#[derive(Debug, Clone)]
pub struct SelectVoice {
    pub session_id: String,
    pub voice_id: String,
}

/// 提交合成
///
/// voice_id 为空时使用会话当前选择的音色
#[derive(Debug, Clone)]
pub struct SubmitSynthesis {
    pub session_id: String,
    pub text: String,
    pub voice_id: Option<String>,
}

/// 清除当前音频产物
#[derive(Debug, Clone)]
pub struct ClearArtifact {
    pub session_id: String,
}
