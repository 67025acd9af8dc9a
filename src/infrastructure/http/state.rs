//! Application State

use std::sync::Arc;

use crate::application::ports::SessionStorePort;
use crate::application::Orchestrator;

/// 应用状态
pub struct AppState {
    pub sessions: Arc<dyn SessionStorePort>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionStorePort>, orchestrator: Orchestrator) -> Self {
        Self {
            sessions,
            orchestrator,
        }
    }
}
