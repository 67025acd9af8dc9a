//! HTTP Layer - JSON API
//!
//! 每个请求对应一次会话交互，返回会话视图

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig, StaticFiles};
pub use state::AppState;
