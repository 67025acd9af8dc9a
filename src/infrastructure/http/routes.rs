//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                         GET   健康检查
//! - /api/session/open                 POST  打开会话（首次渲染）
//! - /api/session/render               POST  重新渲染
//! - /api/session/welcome              POST  关闭欢迎提示
//! - /api/session/retry                POST  手动重试（重建客户端与目录）
//! - /api/session/region               POST  切换区域
//! - /api/session/close                POST  关闭会话
//! - /api/voice/list                   POST  音色目录
//! - /api/voice/select                 POST  选择音色
//! - /api/synthesize                   POST  提交合成
//! - /api/audio/:session_id            GET   内联音频（播放器）
//! - /api/audio/:session_id/download   GET   下载 polly_output.mp3
//! - /api/audio/clear                  POST  清除音频

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/session", session_routes())
        .nest("/voice", voice_routes())
        .route("/synthesize", post(handlers::synthesize))
        .nest("/audio", audio_routes())
}

/// Session 路由
fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/open", post(handlers::open_session))
        .route("/render", post(handlers::render_session))
        .route("/welcome", post(handlers::dismiss_welcome))
        .route("/retry", post(handlers::retry_session))
        .route("/region", post(handlers::change_region))
        .route("/close", post(handlers::close_session))
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", post(handlers::list_voices))
        .route("/select", post(handlers::select_voice))
}

/// Audio 路由
fn audio_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clear", post(handlers::clear_audio))
        .route("/:session_id", get(handlers::get_audio))
        .route("/:session_id/download", get(handlers::download_audio))
}
