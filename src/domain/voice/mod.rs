//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - Provider 音色到领域音色的转换
//! - 语言白名单
//! - 目录排序

mod aggregate;
mod catalog;
mod errors;
mod value_objects;

pub use aggregate::Voice;
pub use catalog::sort_catalog;
pub use errors::VoiceError;
pub use value_objects::{Engine, Gender, LanguageCode, VoiceId, TARGET_LANGUAGES};
