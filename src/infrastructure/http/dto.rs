//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::VoiceOption;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Session DTOs
// ============================================================================

/// 只携带 session_id 的请求
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRegionRequest {
    pub session_id: String,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub session_id: String,
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectVoiceRequest {
    pub session_id: String,
    pub voice_id: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub total: usize,
    pub voices: Vec<VoiceOption>,
}

// ============================================================================
// Synthesis DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub session_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}
