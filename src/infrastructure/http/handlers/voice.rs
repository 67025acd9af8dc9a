//! Voice Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ListVoices, SelectVoice, SessionView};
use crate::infrastructure::http::dto::{
    ApiResponse, SelectVoiceRequest, SessionRequest, VoiceListResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<VoiceListResponse>>, ApiError> {
    let voices = state
        .orchestrator
        .list_voices(ListVoices {
            session_id: req.session_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(VoiceListResponse {
        total: voices.len(),
        voices,
    })))
}

pub async fn select_voice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectVoiceRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let view = state
        .orchestrator
        .select_voice(SelectVoice {
            session_id: req.session_id,
            voice_id: req.voice_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}
