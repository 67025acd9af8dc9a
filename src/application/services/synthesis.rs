//! Synthesis Service - 单次文本合成
//!
//! 不校验 voice_id 是否存在于 Provider，调用方保证它来自当前目录

use crate::application::error::ApplicationError;
use crate::application::ports::{ClientHandle, ProviderError};
use crate::domain::synthesis::{AudioArtifact, SynthesisRequest, SynthesisText};
use crate::domain::voice::VoiceId;

#[derive(Debug, Default)]
pub struct SynthesisService;

impl SynthesisService {
    pub fn new() -> Self {
        Self
    }

    /// 合成一段文本
    ///
    /// 文本为空或超长时返回 ValidationError，不调用 Provider
    pub async fn synthesize(
        &self,
        client: &ClientHandle,
        text: &str,
        voice_id: &VoiceId,
    ) -> Result<AudioArtifact, ApplicationError> {
        let request = SynthesisRequest::new(SynthesisText::new(text)?, voice_id.clone());

        let audio = client.provider().synthesize_speech(&request).await?;
        if audio.is_empty() {
            return Err(ProviderError::Unexpected(
                "Provider returned an empty audio stream".to_string(),
            )
            .into());
        }

        tracing::info!(
            client_id = %client.id(),
            voice_id = %voice_id,
            text_len = request.text().char_count(),
            audio_size = audio.len(),
            "Speech synthesized"
        );

        Ok(AudioArtifact::new(audio, voice_id.clone()))
    }
}
