//! In-Memory Session Store Implementation

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{SessionError, SessionHandle, SessionState, SessionStorePort};

struct SessionEntry {
    handle: SessionHandle,
    last_activity: DateTime<Utc>,
}

/// 内存会话存储
///
/// 活动时间记在 map 条目上，GC 扫描时不需要获取会话锁
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionEntry>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorePort for InMemorySessionStore {
    fn create(&self, state: SessionState) -> Result<String, SessionError> {
        let session_id = state.id.clone();
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyExists(session_id));
        }
        self.sessions.insert(
            session_id.clone(),
            SessionEntry {
                handle: Arc::new(Mutex::new(state)),
                last_activity: Utc::now(),
            },
        );
        tracing::debug!(session_id = %session_id, "Session created");
        Ok(session_id)
    }

    fn get(&self, id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .get(id)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn is_valid(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    fn close(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(id)
            .map(|_| {
                tracing::debug!(session_id = %id, "Session removed");
            })
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn touch(&self, id: &str) {
        if let Some(mut entry) = self.sessions.get_mut(id) {
            entry.last_activity = Utc::now();
        }
    }

    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        // 超出 chrono 可表示范围视为永不过期
        let Some(timeout) = i64::try_from(idle_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
        else {
            return Vec::new();
        };
        let now = Utc::now();

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn list_all(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}
