//! HTTP Middleware
//!
//! 请求日志中间件。按路由模板记录，音频路径里的 session_id 不进日志

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// 超过该耗时的请求记为慢请求（合成会阻塞到 Provider 返回）
pub const SLOW_REQUEST_MS: u64 = 5_000;

/// 请求结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    ServerError,
    ClientError,
    Slow,
    Completed,
}

fn classify(status: StatusCode, elapsed_ms: u64) -> Outcome {
    if status.is_server_error() {
        Outcome::ServerError
    } else if status.is_client_error() {
        Outcome::ClientError
    } else if elapsed_ms >= SLOW_REQUEST_MS {
        Outcome::Slow
    } else {
        Outcome::Completed
    }
}

/// HTTP 请求日志中间件
///
/// 业务错误（errno != 0）的 HTTP 状态仍是 200，在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "<unmatched>".to_string());
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match classify(response.status(), elapsed_ms) {
        Outcome::ServerError => {
            tracing::error!(%method, %route, status, elapsed_ms, "HTTP server error")
        }
        Outcome::ClientError => {
            tracing::warn!(%method, %route, status, elapsed_ms, "HTTP client error")
        }
        Outcome::Slow => {
            tracing::warn!(%method, %route, status, elapsed_ms, "Slow HTTP request")
        }
        Outcome::Completed => {
            tracing::debug!(%method, %route, status, elapsed_ms, "HTTP request completed")
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SessionStorePort;
    use crate::application::Orchestrator;
    use crate::infrastructure::adapters::FakeClientFactory;
    use crate::infrastructure::http::{AppState, HttpServer, ServerConfig};
    use crate::infrastructure::memory::InMemorySessionStore;
    use axum::{body::Body, http::Method, Router};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn router() -> Router {
        let sessions: Arc<dyn SessionStorePort> = Arc::new(InMemorySessionStore::new());
        let orchestrator = Orchestrator::new(
            sessions.clone(),
            Arc::new(FakeClientFactory::with_defaults()),
            "us-east-1",
        );
        HttpServer::new(ServerConfig::default(), AppState::new(sessions, orchestrator))
            .build_router()
    }

    async fn status_of(method: Method, uri: &str) -> StatusCode {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router().oneshot(request).await.unwrap().status()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(StatusCode::INTERNAL_SERVER_ERROR, 0), Outcome::ServerError);
        assert_eq!(classify(StatusCode::NOT_FOUND, 0), Outcome::ClientError);
        assert_eq!(classify(StatusCode::OK, SLOW_REQUEST_MS), Outcome::Slow);
        assert_eq!(classify(StatusCode::OK, 12), Outcome::Completed);
        // 慢但失败的请求按错误记录
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, SLOW_REQUEST_MS * 2),
            Outcome::ServerError
        );
    }

    #[tokio::test]
    async fn test_ping_passes_through() {
        assert_eq!(status_of(Method::GET, "/api/ping").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_business_error_keeps_http_ok() {
        let status = status_of(Method::GET, "/api/audio/unknown-session").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_client_error() {
        let status = status_of(Method::GET, "/api/nothing-here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_client_error() {
        let status = status_of(Method::GET, "/api/synthesize").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
