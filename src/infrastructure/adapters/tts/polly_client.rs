//! Amazon Polly Client - 调用 AWS Polly
//!
//! 实现 SpeechProviderPort / SpeechClientFactoryPort
//!
//! Polly API:
//! - DescribeVoices(Engine=neural, IncludeAdditionalLanguageCodes=false)，按 NextToken 翻页
//! - SynthesizeSpeech(Engine=neural, OutputFormat=mp3, TextType=text)
//!
//! 凭证由 AWS 默认链解析（环境变量、~/.aws/credentials、可选 profile）

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_polly::config::ProvideCredentials;
use aws_sdk_polly::error::{DisplayErrorContext, SdkError};
use aws_sdk_polly::types::{
    Engine as PollyEngine, OutputFormat as PollyOutputFormat, TextType as PollyTextType,
    VoiceId as PollyVoiceId,
};
use aws_sdk_polly::Client;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ProviderError, ProviderVoice, SpeechClientFactoryPort, SpeechProviderPort,
};
use crate::domain::synthesis::{OutputFormat, SynthesisRequest, TextType};
use crate::domain::voice::Engine;

/// Polly 客户端配置
#[derive(Debug, Clone)]
pub struct PollyClientConfig {
    /// 可选的 AWS profile 名称
    pub profile: Option<String>,
    /// 单次操作超时时间（秒）
    pub timeout_secs: u64,
    /// SDK 最大尝试次数（1 表示不重试）
    pub max_attempts: u32,
}

impl Default for PollyClientConfig {
    fn default() -> Self {
        Self {
            profile: None,
            timeout_secs: 60,
            max_attempts: 1,
        }
    }
}

impl PollyClientConfig {
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn retry_config(&self) -> RetryConfig {
        if self.max_attempts <= 1 {
            RetryConfig::disabled()
        } else {
            RetryConfig::standard().with_max_attempts(self.max_attempts)
        }
    }
}

/// Polly 客户端工厂
pub struct PollyClientFactory {
    config: PollyClientConfig,
}

impl PollyClientFactory {
    pub fn new(config: PollyClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SpeechClientFactoryPort for PollyClientFactory {
    async fn connect(&self, region: &str) -> Result<Arc<dyn SpeechProviderPort>, ProviderError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(self.config.retry_config())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(self.config.timeout_secs))
                    .build(),
            );

        if let Some(profile) = &self.config.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;

        // 提前解析凭证，凭证缺失或格式错误时在这里失败
        let credentials = sdk_config.credentials_provider().ok_or_else(|| {
            ProviderError::ClientInit("No AWS credentials provider configured".to_string())
        })?;
        credentials.provide_credentials().await.map_err(|e| {
            ProviderError::ClientInit(format!(
                "Failed to resolve AWS credentials: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        tracing::info!(
            region = %region,
            profile = ?self.config.profile,
            max_attempts = self.config.max_attempts,
            "Polly client created"
        );

        let provider: Arc<dyn SpeechProviderPort> = Arc::new(PollyClient {
            client: Client::new(&sdk_config),
        });
        Ok(provider)
    }
}

/// Polly 客户端
pub struct PollyClient {
    client: Client,
}

fn polly_engine(engine: Engine) -> PollyEngine {
    match engine {
        Engine::Neural => PollyEngine::Neural,
    }
}

fn polly_output_format(format: OutputFormat) -> PollyOutputFormat {
    match format {
        OutputFormat::Mp3 => PollyOutputFormat::Mp3,
    }
}

fn polly_text_type(text_type: TextType) -> PollyTextType {
    match text_type {
        TextType::Plain => PollyTextType::Text,
    }
}

/// SDK 错误分类
///
/// - 请求构建失败、响应无法解析 => Unexpected
/// - 服务端错误（限流、鉴权、参数非法）、连接失败、超时 => Transport
fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ConstructionFailure(_) | SdkError::ResponseError(_) => {
            ProviderError::Unexpected(message)
        }
        _ => ProviderError::Transport(message),
    }
}

#[async_trait]
impl SpeechProviderPort for PollyClient {
    async fn describe_voices(&self, engine: Engine) -> Result<Vec<ProviderVoice>, ProviderError> {
        let mut voices = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .client
                .describe_voices()
                .engine(polly_engine(engine))
                .include_additional_language_codes(false)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(error = %DisplayErrorContext(&e), "Polly DescribeVoices failed");
                    classify_sdk_error(e)
                })?;
            pages += 1;

            next_token = response.next_token().map(str::to_string);

            for voice in response.voices.unwrap_or_default() {
                match (voice.id, voice.name, voice.language_code, voice.gender) {
                    (Some(id), Some(name), Some(language_code), Some(gender)) => {
                        voices.push(ProviderVoice {
                            id: id.as_str().to_string(),
                            name,
                            language_code: language_code.as_str().to_string(),
                            gender: gender.as_str().to_string(),
                        });
                    }
                    (id, name, _, _) => {
                        tracing::debug!(?id, ?name, "Skipping incomplete Polly voice");
                    }
                }
            }

            if next_token.is_none() {
                break;
            }
        }

        tracing::info!(
            engine = engine.as_str(),
            voices = voices.len(),
            pages = pages,
            "Polly voices described"
        );

        Ok(voices)
    }

    async fn synthesize_speech(&self, request: &SynthesisRequest) -> Result<Bytes, ProviderError> {
        tracing::debug!(
            text_len = request.text().char_count(),
            voice_id = %request.voice_id(),
            "Sending Polly SynthesizeSpeech request"
        );

        let response = self
            .client
            .synthesize_speech()
            .text(request.text().as_str())
            .voice_id(PollyVoiceId::from(request.voice_id().as_str()))
            .engine(polly_engine(request.engine()))
            .output_format(polly_output_format(request.output_format()))
            .text_type(polly_text_type(request.text_type()))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %DisplayErrorContext(&e), "Polly SynthesizeSpeech failed");
                classify_sdk_error(e)
            })?;

        // 读完整个音频流，不做流式返回
        let audio = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read audio stream: {}", e)))?
            .into_bytes();

        tracing::info!(
            voice_id = %request.voice_id(),
            audio_size = audio.len(),
            "Polly synthesis completed"
        );

        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PollyClientConfig::default();
        assert_eq!(config.profile, None);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_config_builder() {
        let config = PollyClientConfig::default()
            .with_profile("tts")
            .with_timeout(15);
        assert_eq!(config.profile.as_deref(), Some("tts"));
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_fixed_wire_parameters() {
        assert_eq!(polly_engine(Engine::Neural), PollyEngine::Neural);
        assert_eq!(polly_output_format(OutputFormat::Mp3), PollyOutputFormat::Mp3);
        assert_eq!(polly_text_type(TextType::Plain), PollyTextType::Text);
    }

    #[test]
    fn test_construction_failure_is_unexpected() {
        let err = SdkError::<std::io::Error, ()>::construction_failure("bad request input");
        assert!(matches!(classify_sdk_error(err), ProviderError::Unexpected(_)));
    }

    #[test]
    fn test_timeout_is_transport() {
        let err = SdkError::<std::io::Error, ()>::timeout_error("operation timed out");
        assert!(matches!(classify_sdk_error(err), ProviderError::Transport(_)));
    }

    #[test]
    fn test_unparseable_response_is_unexpected() {
        let err = SdkError::<std::io::Error, ()>::response_error("invalid XML in DescribeVoices", ());
        assert!(matches!(classify_sdk_error(err), ProviderError::Unexpected(_)));
    }
}
