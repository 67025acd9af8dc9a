//! Fake Speech Provider - 离线 Provider 实现
//!
//! 返回固定音色列表和固定音频，不访问网络。
//! `provider.kind = "fake"` 时用于本地运行，同时也是测试替身（调用计数、可注入错误）

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::ports::{
    ProviderError, ProviderVoice, SpeechClientFactoryPort, SpeechProviderPort,
};
use crate::domain::synthesis::SynthesisRequest;
use crate::domain::voice::Engine;

/// 固定返回的音频（ID3 头 + 一个 MPEG 帧头）
pub const FAKE_MP3: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00\xff\xfb\x90\x64\x00\x00\x00\x00";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fake Provider 配置
#[derive(Debug, Clone)]
pub struct FakeProviderConfig {
    /// describe_voices 返回的音色（原样返回，不做过滤）
    pub voices: Vec<ProviderVoice>,
    /// synthesize_speech 返回的音频
    pub audio: Bytes,
    /// 模拟网络延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeProviderConfig {
    fn default() -> Self {
        Self {
            voices: default_voices(),
            audio: Bytes::from_static(FAKE_MP3),
            latency_ms: 0,
        }
    }
}

/// 构造一个 Provider 音色
pub fn provider_voice(id: &str, language_code: &str, gender: &str) -> ProviderVoice {
    ProviderVoice {
        id: id.to_string(),
        name: id.to_string(),
        language_code: language_code.to_string(),
        gender: gender.to_string(),
    }
}

fn default_voices() -> Vec<ProviderVoice> {
    vec![
        provider_voice("Joanna", "en-US", "Female"),
        provider_voice("Matthew", "en-US", "Male"),
        provider_voice("Amy", "en-GB", "Female"),
        provider_voice("Brian", "en-GB", "Male"),
        provider_voice("Lea", "fr-FR", "Female"),
    ]
}

/// 最近一次合成请求的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub text: String,
    pub voice_id: String,
    pub engine: Engine,
}

/// Fake Speech Provider
pub struct FakeSpeechProvider {
    config: FakeProviderConfig,
    describe_calls: AtomicUsize,
    synthesize_calls: AtomicUsize,
    synthesis_in_flight: AtomicUsize,
    max_synthesis_in_flight: AtomicUsize,
    describe_failure: Mutex<Option<ProviderError>>,
    synthesis_failure: Mutex<Option<ProviderError>>,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl FakeSpeechProvider {
    pub fn new(config: FakeProviderConfig) -> Self {
        tracing::info!(
            voices = config.voices.len(),
            audio_size = config.audio.len(),
            "FakeSpeechProvider initialized"
        );
        Self {
            config,
            describe_calls: AtomicUsize::new(0),
            synthesize_calls: AtomicUsize::new(0),
            synthesis_in_flight: AtomicUsize::new(0),
            max_synthesis_in_flight: AtomicUsize::new(0),
            describe_failure: Mutex::new(None),
            synthesis_failure: Mutex::new(None),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeProviderConfig::default())
    }

    pub fn with_voices(voices: Vec<ProviderVoice>) -> Self {
        Self::new(FakeProviderConfig {
            voices,
            ..Default::default()
        })
    }

    /// 之后的 describe_voices 调用都返回该错误，None 恢复正常
    pub fn fail_describe(&self, error: Option<ProviderError>) {
        *lock(&self.describe_failure) = error;
    }

    /// 之后的 synthesize_speech 调用都返回该错误，None 恢复正常
    pub fn fail_synthesis(&self, error: Option<ProviderError>) {
        *lock(&self.synthesis_failure) = error;
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }

    /// 同时进行中的合成请求的历史最大值
    pub fn max_synthesis_in_flight(&self) -> usize {
        self.max_synthesis_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.last_request).clone()
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

#[async_trait]
impl SpeechProviderPort for FakeSpeechProvider {
    async fn describe_voices(&self, engine: Engine) -> Result<Vec<ProviderVoice>, ProviderError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(error) = lock(&self.describe_failure).clone() {
            return Err(error);
        }

        tracing::debug!(engine = engine.as_str(), "FakeSpeechProvider: returning fixed voices");
        Ok(self.config.voices.clone())
    }

    async fn synthesize_speech(&self, request: &SynthesisRequest) -> Result<Bytes, ProviderError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_request) = Some(RecordedRequest {
            text: request.text().as_str().to_string(),
            voice_id: request.voice_id().as_str().to_string(),
            engine: request.engine(),
        });

        let in_flight = self.synthesis_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_synthesis_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        self.simulate_latency().await;
        self.synthesis_in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = lock(&self.synthesis_failure).clone() {
            return Err(error);
        }

        tracing::debug!(
            text_len = request.text().char_count(),
            voice_id = %request.voice_id(),
            "FakeSpeechProvider: returning fixed audio"
        );
        Ok(self.config.audio.clone())
    }
}

/// Fake 客户端工厂，每次 connect 返回同一个 FakeSpeechProvider
pub struct FakeClientFactory {
    provider: Arc<FakeSpeechProvider>,
    connect_failure: Mutex<Option<String>>,
    connected_regions: Mutex<Vec<String>>,
}

impl FakeClientFactory {
    pub fn new(provider: Arc<FakeSpeechProvider>) -> Self {
        Self {
            provider,
            connect_failure: Mutex::new(None),
            connected_regions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Arc::new(FakeSpeechProvider::with_defaults()))
    }

    pub fn provider(&self) -> Arc<FakeSpeechProvider> {
        self.provider.clone()
    }

    /// 之后的 connect 调用都以该消息失败，None 恢复正常
    pub fn fail_connect(&self, message: Option<&str>) {
        *lock(&self.connect_failure) = message.map(str::to_string);
    }

    pub fn connect_calls(&self) -> usize {
        lock(&self.connected_regions).len()
    }

    pub fn connected_regions(&self) -> Vec<String> {
        lock(&self.connected_regions).clone()
    }
}

#[async_trait]
impl SpeechClientFactoryPort for FakeClientFactory {
    async fn connect(&self, region: &str) -> Result<Arc<dyn SpeechProviderPort>, ProviderError> {
        lock(&self.connected_regions).push(region.to_string());

        if let Some(message) = lock(&self.connect_failure).clone() {
            return Err(ProviderError::ClientInit(message));
        }

        let provider: Arc<dyn SpeechProviderPort> = self.provider.clone();
        Ok(provider)
    }
}
