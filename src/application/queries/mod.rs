//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：由 Orchestrator 处理

mod audio_queries;
mod voice_queries;

pub use audio_queries::*;
pub use voice_queries::*;
