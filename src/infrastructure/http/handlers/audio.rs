//! Audio Handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::application::{ClearArtifact, GetArtifact, SessionView};
use crate::domain::synthesis::{AudioArtifact, DOWNLOAD_FILE_NAME};
use crate::infrastructure::http::dto::{ApiResponse, SessionRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

fn audio_response(artifact: AudioArtifact, attachment: bool) -> Result<Response, ApiError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.mime_type())
        .header(header::CONTENT_LENGTH, artifact.len())
        .header(header::CACHE_CONTROL, "no-store");

    if attachment {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
        );
    }

    builder
        .body(Body::from(artifact.bytes()))
        .map_err(|e| ApiError::Internal(format!("Failed to build audio response: {}", e)))
}

/// 播放器使用的内联音频
pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let artifact = state
        .orchestrator
        .artifact(GetArtifact { session_id })
        .await?;
    audio_response(artifact, false)
}

/// 下载（polly_output.mp3）
pub async fn download_audio(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let artifact = state
        .orchestrator
        .artifact(GetArtifact { session_id })
        .await?;
    audio_response(artifact, true)
}

pub async fn clear_audio(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let view = state
        .orchestrator
        .clear_artifact(ClearArtifact {
            session_id: req.session_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}
