//! Synthesis Context - 合成限界上下文
//!
//! 职责:
//! - 合成请求的输入校验
//! - 音频产物与会话结果存储

mod artifact;
mod errors;
mod value_objects;

pub use artifact::{AudioArtifact, ResultStore, DOWNLOAD_FILE_NAME};
pub use errors::SynthesisTextError;
pub use value_objects::{OutputFormat, SynthesisRequest, SynthesisText, TextType, MAX_TEXT_CHARS};
