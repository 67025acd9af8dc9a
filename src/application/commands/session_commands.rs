//! Session Commands - 会话相关命令

/// 打开新会话并执行首次渲染
#[derive(Debug, Clone, Default)]
pub struct OpenSession {
    /// 覆盖默认区域
    pub region: Option<String>,
}

/// 重新渲染（确保客户端与目录就绪）
#[derive(Debug, Clone)]
pub struct RenderSession {
    pub session_id: String,
}

/// 关闭欢迎提示
#[derive(Debug, Clone)]
pub struct DismissWelcome {
    pub session_id: String,
}

/// 手动重试：丢弃客户端与目录后重新渲染
#[derive(Debug, Clone)]
pub struct RetrySession {
    pub session_id: String,
}

/// 切换会话区域，None 回到默认区域
#[derive(Debug, Clone)]
pub struct ChangeRegion {
    pub session_id: String,
    pub region: Option<String>,
}

/// 关闭会话
#[derive(Debug, Clone)]
pub struct CloseSession {
    pub session_id: String,
}
