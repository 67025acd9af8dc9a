//! Audio Queries

/// 读取会话当前的音频产物，不修改任何状态
#[derive(Debug, Clone)]
pub struct GetArtifact {
    pub session_id: String,
}
