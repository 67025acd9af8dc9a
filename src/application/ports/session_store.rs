//! Session Store Port - 会话生命周期管理
//!
//! 定义会话存储的抽象接口，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ClientHandle;
use crate::application::orchestrator::{InteractionState, Notice};
use crate::domain::synthesis::ResultStore;
use crate::domain::voice::{Voice, VoiceId};

/// Session Store 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),
}

/// 音色目录快照，按客户端 id 缓存
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub client_id: Uuid,
    pub voices: Vec<Voice>,
    pub fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(client_id: Uuid, voices: Vec<Voice>) -> Self {
        Self {
            client_id,
            voices,
            fetched_at: Utc::now(),
        }
    }

    pub fn contains(&self, voice_id: &VoiceId) -> bool {
        self.voices.iter().any(|v| v.id() == voice_id)
    }
}

/// 会话状态（in-memory）
///
/// 客户端、目录缓存和音频产物都只属于这一个会话
#[derive(Debug)]
pub struct SessionState {
    pub id: String,
    /// 覆盖默认区域，None 时使用服务端配置
    pub region: Option<String>,
    pub client: Option<ClientHandle>,
    pub voice_catalog: Option<CatalogSnapshot>,
    pub results: ResultStore,
    pub has_shown_welcome: bool,
    pub interaction: InteractionState,
    pub selected_voice: Option<VoiceId>,
    /// 进入 Failed 时的用户可见原因，每次渲染重复展示
    pub failure_message: Option<String>,
    /// 本次交互产生的提示，每次交互开始时清空
    pub notices: Vec<Notice>,
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            region: None,
            client: None,
            voice_catalog: None,
            results: ResultStore::new(),
            has_shown_welcome: false,
            interaction: InteractionState::Idle,
            selected_voice: None,
            failure_message: None,
            notices: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// 丢弃客户端及其目录缓存
    pub fn drop_client(&mut self) {
        self.client = None;
        self.voice_catalog = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// 会话句柄：一次交互持有锁直到返回，保证同一会话内不会有重叠请求
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Session Store Port
///
/// 管理会话的生命周期，所有状态存储在内存中
pub trait SessionStorePort: Send + Sync {
    /// 创建新会话
    fn create(&self, state: SessionState) -> Result<String, SessionError>;

    /// 获取会话句柄
    fn get(&self, id: &str) -> Result<SessionHandle, SessionError>;

    /// 检查会话是否有效
    fn is_valid(&self, id: &str) -> bool;

    /// 关闭会话（客户端、目录缓存、音频随之销毁）
    fn close(&self, id: &str) -> Result<(), SessionError>;

    /// 更新最后活动时间
    fn touch(&self, id: &str);

    /// 获取所有过期会话的 ID
    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String>;

    /// 获取所有会话 ID
    fn list_all(&self) -> Vec<String>;
}
