//! Session Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    ChangeRegion, CloseSession, DismissWelcome, OpenSession, RenderSession, RetrySession, SessionView,
};
use crate::infrastructure::http::dto::{
    ApiResponse, ChangeRegionRequest, CloseSessionResponse, OpenSessionRequest, SessionRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 打开会话，请求体可省略
pub async fn open_session(
    State(state): State<Arc<AppState>>,
    req: Option<Json<OpenSessionRequest>>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let req = req.map(|Json(req)| req).unwrap_or_default();
    let view = state
        .orchestrator
        .open_session(OpenSession { region: req.region })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn render_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let view = state
        .orchestrator
        .render(RenderSession {
            session_id: req.session_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn dismiss_welcome(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let view = state
        .orchestrator
        .dismiss_welcome(DismissWelcome {
            session_id: req.session_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn retry_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let view = state
        .orchestrator
        .retry(RetrySession {
            session_id: req.session_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn change_region(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChangeRegionRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let view = state
        .orchestrator
        .change_region(ChangeRegion {
            session_id: req.session_id,
            region: req.region,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<CloseSessionResponse>>, ApiError> {
    state
        .orchestrator
        .close_session(CloseSession {
            session_id: req.session_id.clone(),
        })
        .await?;
    Ok(Json(ApiResponse::success(CloseSessionResponse {
        session_id: req.session_id,
    })))
}
