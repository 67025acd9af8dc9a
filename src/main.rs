//! Voxify - Amazon Polly 文本转语音服务
//!
//! - Domain: voice/, synthesis/
//! - Application: ports, services, orchestrator
//! - Infrastructure: http, memory, worker, adapters

use std::sync::Arc;

use voxify::application::ports::{SessionStorePort, SpeechClientFactoryPort};
use voxify::application::Orchestrator;
use voxify::config::{load_config, print_config, AppConfig, ProviderKind};
use voxify::infrastructure::adapters::{FakeClientFactory, PollyClientConfig, PollyClientFactory};
use voxify::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voxify::infrastructure::memory::InMemorySessionStore;
use voxify::infrastructure::worker::{SessionGcConfig, SessionGcWorker};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},voxify={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn build_client_factory(config: &AppConfig) -> Arc<dyn SpeechClientFactoryPort> {
    match config.provider.kind {
        ProviderKind::Polly => {
            let mut polly_config = PollyClientConfig {
                max_attempts: config.provider.max_attempts,
                ..Default::default()
            }
            .with_timeout(config.provider.timeout_secs);
            if let Some(profile) = &config.provider.profile {
                polly_config = polly_config.with_profile(profile);
            }
            Arc::new(PollyClientFactory::new(polly_config))
        }
        ProviderKind::Fake => {
            tracing::warn!("Using fake speech provider, no audio will be requested from AWS");
            Arc::new(FakeClientFactory::with_defaults())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 中的 AWS 凭证和区域
    let dotenv_path = dotenvy::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Voxify - Amazon Polly TTS");
    if let Some(path) = dotenv_path {
        tracing::info!("Loaded environment from {}", path.display());
    }
    print_config(&config);

    // 会话存储
    let sessions: Arc<dyn SessionStorePort> = Arc::new(InMemorySessionStore::new());

    // 编排器
    let orchestrator = Orchestrator::new(
        sessions.clone(),
        build_client_factory(&config),
        config.provider.resolved_region(),
    );

    // 空闲会话清理
    if config.session.gc_enabled {
        let worker = SessionGcWorker::new(
            SessionGcConfig {
                idle_timeout_secs: config.session.idle_timeout_secs,
                interval_secs: config.session.gc_interval_secs,
            },
            sessions.clone(),
        );
        tokio::spawn(worker.run());
    }

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_files(
            config.server.static_files.dir.clone(),
            config.server.static_files.path.clone(),
        );
    }
    let server = HttpServer::new(server_config, AppState::new(sessions, orchestrator));

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
