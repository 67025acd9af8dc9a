//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Voice Context: 音色与目录规则
//! - Synthesis Context: 合成请求与音频产物

pub mod synthesis;
pub mod voice;
