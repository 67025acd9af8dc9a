//! Voice Catalog Service - 音色目录
//!
//! 拉取 neural 音色，按语言白名单过滤并排序，按客户端 id 缓存在会话里

use crate::application::ports::{
    CatalogSnapshot, ClientHandle, ProviderError, ProviderVoice, SessionState,
};
use crate::domain::voice::{sort_catalog, Engine, Voice};

/// 过滤 + 转换 + 排序
///
/// 语言不在白名单内的音色静默丢弃；性别等字段异常的音色记录日志后丢弃
pub fn build_catalog(provider_voices: Vec<ProviderVoice>) -> Vec<Voice> {
    let mut voices: Vec<Voice> = provider_voices
        .into_iter()
        .filter_map(|v| {
            match Voice::from_provider_fields(&v.id, &v.name, &v.language_code, &v.gender) {
                Ok(voice) => Some(voice),
                Err(crate::domain::voice::VoiceError::UnsupportedLanguage(_)) => None,
                Err(e) => {
                    tracing::debug!(voice_id = %v.id, error = %e, "Skipping malformed voice");
                    None
                }
            }
        })
        .collect();
    sort_catalog(&mut voices);
    voices
}

#[derive(Debug, Default)]
pub struct VoiceCatalogService;

impl VoiceCatalogService {
    pub fn new() -> Self {
        Self
    }

    /// 获取客户端对应的音色目录
    ///
    /// 缓存命中时不访问 Provider；失败和空结果不缓存
    pub async fn list_voices(
        &self,
        session: &mut SessionState,
        client: &ClientHandle,
    ) -> Result<Vec<Voice>, ProviderError> {
        if let Some(snapshot) = &session.voice_catalog {
            if snapshot.client_id == client.id() {
                tracing::debug!(
                    session_id = %session.id,
                    voices = snapshot.voices.len(),
                    "Voice catalog cache hit"
                );
                return Ok(snapshot.voices.clone());
            }
        }

        let provider_voices = client.provider().describe_voices(Engine::Neural).await?;
        let total = provider_voices.len();
        let voices = build_catalog(provider_voices);

        tracing::info!(
            session_id = %session.id,
            client_id = %client.id(),
            provider_voices = total,
            catalog_voices = voices.len(),
            "Voice catalog fetched"
        );

        if !voices.is_empty() {
            session.voice_catalog = Some(CatalogSnapshot::new(client.id(), voices.clone()));
        }

        Ok(voices)
    }
}
