//! Provider Client Service - 会话级客户端缓存
//!
//! 每个会话最多一个客户端，首次使用时创建。
//! 只有会话结束或区域变化时才失效，失效时一并丢弃音色目录缓存

use std::sync::Arc;

use crate::application::ports::{
    ClientHandle, ProviderError, SessionState, SpeechClientFactoryPort,
};

/// 默认区域
pub const DEFAULT_REGION: &str = "us-east-1";

pub struct ProviderClientService {
    factory: Arc<dyn SpeechClientFactoryPort>,
    default_region: String,
}

impl ProviderClientService {
    pub fn new(factory: Arc<dyn SpeechClientFactoryPort>, default_region: impl Into<String>) -> Self {
        Self {
            factory,
            default_region: default_region.into(),
        }
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    /// 获取会话客户端
    ///
    /// 同一区域直接返回缓存的句柄；构建失败返回 ProviderError::ClientInit，不自动重试
    pub async fn get_client(
        &self,
        session: &mut SessionState,
        region: Option<&str>,
    ) -> Result<ClientHandle, ProviderError> {
        let region = region.unwrap_or(self.default_region.as_str());

        if let Some(client) = &session.client {
            if client.region() == region {
                tracing::debug!(session_id = %session.id, client_id = %client.id(), "Client cache hit");
                return Ok(client.clone());
            }
            tracing::info!(
                session_id = %session.id,
                old_region = %client.region(),
                new_region = %region,
                "Region changed, dropping cached client"
            );
            session.drop_client();
        }

        let provider = self.factory.connect(region).await.map_err(|e| match e {
            ProviderError::ClientInit(_) => e,
            other => ProviderError::ClientInit(other.to_string()),
        })?;

        let client = ClientHandle::new(region, provider);
        tracing::info!(
            session_id = %session.id,
            client_id = %client.id(),
            region = %region,
            "Provider client created"
        );
        session.client = Some(client.clone());
        Ok(client)
    }
}
