//! Session GC Worker - 清理空闲会话
//!
//! 关闭超过 idle_timeout_secs 没有交互的会话，客户端、目录缓存和音频随之释放

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::SessionStorePort;

/// GC 配置
#[derive(Debug, Clone)]
pub struct SessionGcConfig {
    pub idle_timeout_secs: u64,
    pub interval_secs: u64,
}

impl Default for SessionGcConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            interval_secs: 300,
        }
    }
}

pub struct SessionGcWorker {
    config: SessionGcConfig,
    sessions: Arc<dyn SessionStorePort>,
}

impl SessionGcWorker {
    pub fn new(config: SessionGcConfig, sessions: Arc<dyn SessionStorePort>) -> Self {
        Self { config, sessions }
    }

    /// 启动 Worker（不返回）
    pub async fn run(self) {
        tracing::info!(
            idle_timeout_secs = self.config.idle_timeout_secs,
            interval_secs = self.config.interval_secs,
            "SessionGcWorker started"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // 第一次 tick 立即返回
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep();
        }
    }

    /// 执行一次清理，返回关闭的会话数
    pub fn sweep(&self) -> usize {
        let expired = self
            .sessions
            .get_expired_sessions(self.config.idle_timeout_secs);

        let mut closed = 0;
        for session_id in expired {
            match self.sessions.close(&session_id) {
                Ok(()) => {
                    tracing::info!(session_id = %session_id, "Idle session closed");
                    closed += 1;
                }
                // 可能已被用户关闭
                Err(e) => tracing::debug!(session_id = %session_id, error = %e, "Skip expired session"),
            }
        }

        if closed > 0 {
            tracing::info!(
                closed = closed,
                remaining = self.sessions.list_all().len(),
                "Session GC sweep finished"
            );
        }
        closed
    }
}
