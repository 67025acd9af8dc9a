//! Voxify - Amazon Polly 文本转语音服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色、语言白名单、目录排序
//! - Synthesis Context: 合成输入校验、音频产物、结果存储
//!
//! 应用层 (application/):
//! - Ports: SpeechProvider, SessionStore
//! - Services: 会话级客户端缓存、音色目录缓存、文本合成
//! - Orchestrator: 会话交互状态机
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API + 音频下载
//! - Memory: SessionStore 内存实现
//! - Worker: 空闲会话清理
//! - Adapters: Amazon Polly 客户端, Fake Provider

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
