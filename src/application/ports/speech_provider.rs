//! Speech Provider Port - 云端 TTS 服务抽象
//!
//! 定义 Provider 客户端与客户端工厂的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::synthesis::SynthesisRequest;
use crate::domain::voice::Engine;

/// Provider 错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// 客户端构建失败（凭证格式错误、SDK 初始化失败等）
    #[error("Failed to initialize speech provider client: {0}")]
    ClientInit(String),

    /// Provider 或网络侧错误（限流、鉴权拒绝、参数非法、超时等）
    #[error("{0}")]
    Transport(String),

    /// 其他错误（包括 Provider 返回格式异常）
    #[error("{0}")]
    Unexpected(String),
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClientInit(_) => "client_init",
            Self::Transport(_) => "transport",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// Provider 返回的原始音色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderVoice {
    pub id: String,
    pub name: String,
    pub language_code: String,
    pub gender: String,
}

/// Speech Provider Port
///
/// 一个已鉴权的 Provider 连接
#[async_trait]
pub trait SpeechProviderPort: Send + Sync {
    /// 列出指定引擎档位的音色（由实现负责翻页）
    async fn describe_voices(&self, engine: Engine) -> Result<Vec<ProviderVoice>, ProviderError>;

    /// 执行一次合成，读完整个音频流后返回
    async fn synthesize_speech(&self, request: &SynthesisRequest) -> Result<Bytes, ProviderError>;
}

/// Provider 客户端工厂
#[async_trait]
pub trait SpeechClientFactoryPort: Send + Sync {
    /// 构建指定区域的客户端，失败时返回 ProviderError::ClientInit
    async fn connect(&self, region: &str) -> Result<Arc<dyn SpeechProviderPort>, ProviderError>;
}

/// 会话持有的客户端句柄
///
/// id 作为音色目录缓存的 key
#[derive(Clone)]
pub struct ClientHandle {
    id: Uuid,
    region: String,
    created_at: DateTime<Utc>,
    provider: Arc<dyn SpeechProviderPort>,
}

impl ClientHandle {
    pub fn new(region: impl Into<String>, provider: Arc<dyn SpeechProviderPort>) -> Self {
        Self {
            id: Uuid::new_v4(),
            region: region.into(),
            created_at: Utc::now(),
            provider,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn provider(&self) -> &dyn SpeechProviderPort {
        self.provider.as_ref()
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
