//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod session_store;
mod speech_provider;

pub use session_store::{
    CatalogSnapshot, SessionError, SessionHandle, SessionState, SessionStorePort,
};
pub use speech_provider::{
    ClientHandle, ProviderError, ProviderVoice, SpeechClientFactoryPort, SpeechProviderPort,
};
