//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：由 Orchestrator 处理

mod session_commands;
mod synthesis_commands;

pub use session_commands::*;
pub use synthesis_commands::*;
