//! Synthesis Context - 音频产物与结果存储

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::OutputFormat;
use crate::domain::voice::VoiceId;

/// 下载文件名
pub const DOWNLOAD_FILE_NAME: &str = "polly_output.mp3";

/// 一次成功合成的音频产物
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    bytes: Bytes,
    format: OutputFormat,
    voice_id: VoiceId,
    created_at: DateTime<Utc>,
}

impl AudioArtifact {
    pub fn new(bytes: Bytes, voice_id: VoiceId) -> Self {
        Self {
            bytes,
            format: OutputFormat::Mp3,
            voice_id,
            created_at: Utc::now(),
        }
    }

    /// 音频字节（Bytes 克隆为引用计数，不复制数据）
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn voice_id(&self) -> &VoiceId {
        &self.voice_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 会话级结果存储
///
/// 不变量:
/// - 最多持有一个产物，set 整体替换
/// - get 不修改、不过期
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    latest: Option<AudioArtifact>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&AudioArtifact> {
        self.latest.as_ref()
    }

    pub fn set(&mut self, artifact: AudioArtifact) {
        self.latest = Some(artifact);
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(data: &'static [u8]) -> AudioArtifact {
        AudioArtifact::new(Bytes::from_static(data), VoiceId::new("Joanna").unwrap())
    }

    #[test]
    fn test_repeated_reads_are_stable() {
        let mut store = ResultStore::new();
        store.set(artifact(b"ID3first"));

        let first = store.get().cloned();
        for _ in 0..5 {
            assert_eq!(store.get().cloned(), first);
        }
        assert_eq!(store.get().unwrap().mime_type(), "audio/mp3");
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let mut store = ResultStore::new();
        store.set(artifact(b"ID3first"));
        store.set(artifact(b"ID3second"));
        assert_eq!(store.get().unwrap().bytes(), Bytes::from_static(b"ID3second"));
    }

    #[test]
    fn test_clear() {
        let mut store = ResultStore::new();
        store.set(artifact(b"ID3"));
        store.clear();
        assert!(store.is_empty());
        assert!(store.get().is_none());
    }
}
