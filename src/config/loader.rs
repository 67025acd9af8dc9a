//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "VOXIFY";

/// AWS SDK 约定的区域变量
const AWS_REGION_VAR: &str = "AWS_REGION";

/// 会话空闲超时上限（30 天）
pub const MAX_IDLE_TIMEOUT_SECS: u64 = 30 * 24 * 3600;

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXIFY_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// `provider.region` 未显式设置时使用 `AWS_REGION`
///
/// # 环境变量示例
/// - `VOXIFY_SERVER__PORT=8080`
/// - `VOXIFY_PROVIDER__KIND=fake`
/// - `VOXIFY_PROVIDER__PROFILE=dev`
/// - `VOXIFY_SESSION__IDLE_TIMEOUT_SECS=600`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8501)?
        .set_default("provider.kind", "polly")?
        .set_default("provider.timeout_secs", 60)?
        .set_default("provider.max_attempts", 1)?
        .set_default("session.idle_timeout_secs", 3600)?
        .set_default("session.gc_enabled", true)?
        .set_default("session.gc_interval_secs", 300)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: VOXIFY_PROVIDER__REGION=eu-west-2
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 区域回退到 AWS_REGION
    apply_region_fallback(&mut app_config, std::env::var(AWS_REGION_VAR).ok());

    // 7. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

fn apply_region_fallback(config: &mut AppConfig, aws_region: Option<String>) {
    if config.provider.region.is_none() {
        config.provider.region = aws_region.filter(|r| !r.trim().is_empty());
    }
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if let Some(region) = &config.provider.region {
        if region.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Provider region cannot be empty".to_string(),
            ));
        }
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Provider timeout cannot be 0".to_string(),
        ));
    }

    if config.provider.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Provider max_attempts must be at least 1".to_string(),
        ));
    }

    if config.session.idle_timeout_secs == 0
        || config.session.idle_timeout_secs > MAX_IDLE_TIMEOUT_SECS
    {
        return Err(ConfigError::ValidationError(format!(
            "Session idle timeout must be between 1 and {} seconds",
            MAX_IDLE_TIMEOUT_SECS
        )));
    }

    if config.session.gc_enabled && config.session.gc_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "GC interval cannot be 0 when GC is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志，不包含凭证）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    if config.server.static_files.enabled {
        tracing::info!(
            "Static Files: {:?} at {}",
            config.server.static_files.dir,
            config.server.static_files.path
        );
    }
    tracing::info!("Provider: {}", config.provider.kind.as_str());
    tracing::info!("Region: {}", config.provider.resolved_region());
    if let Some(profile) = &config.provider.profile {
        tracing::info!("AWS Profile: {}", profile);
    }
    tracing::info!("Provider Timeout: {}s", config.provider.timeout_secs);
    tracing::info!("Provider Max Attempts: {}", config.provider.max_attempts);
    tracing::info!("Session Idle Timeout: {}s", config.session.idle_timeout_secs);
    tracing::info!("Session GC Enabled: {}", config.session.gc_enabled);
    if config.session.gc_enabled {
        tracing::info!("Session GC Interval: {}s", config.session.gc_interval_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
