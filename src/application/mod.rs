//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechProvider、SessionStore）
//! - services: 客户端缓存、音色目录、文本合成
//! - orchestrator: 会话交互状态机
//! - commands / queries: 交互输入
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod queries;
pub mod services;

// Re-exports
pub use commands::{
    ChangeRegion, ClearArtifact, CloseSession, DismissWelcome, OpenSession, RenderSession, RetrySession,
    SelectVoice, SubmitSynthesis,
};

pub use error::ApplicationError;

pub use orchestrator::{
    ArtifactInfo, FailureKind, InteractionState, Notice, NoticeLevel, Orchestrator, SessionView,
    VoiceOption,
};

pub use ports::{
    // Session store
    CatalogSnapshot,
    SessionError,
    SessionHandle,
    SessionState,
    SessionStorePort,
    // Speech provider
    ClientHandle,
    ProviderError,
    ProviderVoice,
    SpeechClientFactoryPort,
    SpeechProviderPort,
};

pub use queries::{GetArtifact, ListVoices};

pub use services::{ProviderClientService, SynthesisService, VoiceCatalogService, DEFAULT_REGION};
