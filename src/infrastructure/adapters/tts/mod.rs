//! TTS Adapter - Speech Provider 实现

mod fake_provider;
mod polly_client;

pub use fake_provider::{
    provider_voice, FakeClientFactory, FakeProviderConfig, FakeSpeechProvider, RecordedRequest,
    FAKE_MP3,
};
pub use polly_client::*;
