//! Voice Queries

/// 列出会话的音色目录（已过滤、已排序）
#[derive(Debug, Clone)]
pub struct ListVoices {
    pub session_id: String,
}
