//! Memory Layer - In-Memory State Management
//!
//! 实现 SessionStore，保存会话的客户端、目录缓存和音频产物

mod session_store;

pub use session_store::InMemorySessionStore;
