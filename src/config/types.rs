//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::DEFAULT_REGION;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech Provider 配置
    #[serde(default)]
    pub provider: ProviderConfig,

    /// 会话配置
    #[serde(default)]
    pub session: SessionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_enabled() -> bool {
    false
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Provider 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Amazon Polly
    #[default]
    Polly,
    /// 离线 Fake Provider（固定音色、固定音频）
    Fake,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polly => "polly",
            Self::Fake => "fake",
        }
    }
}

/// Speech Provider 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// 区域，未设置时依次使用 AWS_REGION 和 us-east-1
    #[serde(default)]
    pub region: Option<String>,

    /// 可选的 AWS profile 名称
    #[serde(default)]
    pub profile: Option<String>,

    /// 单次请求超时时间（秒）
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,

    /// SDK 最大尝试次数，1 表示不重试
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_provider_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    1
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            region: None,
            profile: None,
            timeout_secs: default_provider_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ProviderConfig {
    /// 生效的区域
    pub fn resolved_region(&self) -> String {
        self.region
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }
}

/// 会话配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// 空闲多久后关闭会话（秒）
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// 是否启用空闲会话清理
    #[serde(default = "default_gc_enabled")]
    pub gc_enabled: bool,

    /// 清理间隔（秒）
    #[serde(default = "default_gc_interval")]
    pub gc_interval_secs: u64,
}

fn default_idle_timeout() -> u64 {
    3600 // 1 小时
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    300 // 5 分钟
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            gc_enabled: default_gc_enabled(),
            gc_interval_secs: default_gc_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.provider.kind, ProviderKind::Polly);
        assert_eq!(config.provider.timeout_secs, 60);
        assert_eq!(config.provider.max_attempts, 1);
        assert_eq!(config.session.idle_timeout_secs, 3600);
        assert!(!config.server.static_files.enabled);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8501");
    }

    #[test]
    fn test_resolved_region() {
        let mut config = ProviderConfig::default();
        assert_eq!(config.resolved_region(), "us-east-1");

        config.region = Some("eu-west-2".to_string());
        assert_eq!(config.resolved_region(), "eu-west-2");

        config.region = Some("  ".to_string());
        assert_eq!(config.resolved_region(), "us-east-1");
    }
}
