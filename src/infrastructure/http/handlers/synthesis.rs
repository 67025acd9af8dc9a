//! Synthesis Handler

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{SessionView, SubmitSynthesis};
use crate::infrastructure::http::dto::{ApiResponse, SynthesizeRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 提交合成
///
/// 合成失败同样返回 errno 0，失败信息在会话视图的 notices 里
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SynthesizeRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let view = state
        .orchestrator
        .submit(SubmitSynthesis {
            session_id: req.session_id,
            text: req.text,
            voice_id: req.voice_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}
