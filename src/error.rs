//! 推送流水线错误类型
//!
//! 覆盖从配置检查到远端写入的全部失败分类。
//! 所有错误都会在 worker 边界被捕获，转换为活动日志条目 + 通知，
//! 不向上传播、不触发重试。

use thiserror::Error;

/// 推送流水线错误
#[derive(Debug, Error)]
pub enum PushError {
    /// 配置缺失（token 或仓库路径未设置），在任何网络调用之前中止
    #[error("GitHub 配置缺失: {0}")]
    ConfigMissing(&'static str),

    /// 功能已关闭，静默短路（仅留一条日志）
    #[error("扩展功能已关闭")]
    Disabled,

    /// 无法从页面提取代码，在任何网络调用之前中止
    #[error("无法提取代码: {0}")]
    Extraction(String),

    /// 远端拒绝写入（非预期状态码），携带远端返回的 message
    #[error("GitHub API 拒绝 (状态 {status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// 网络层异常（连接失败、超时等）
    #[error("网络错误: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PushError {
    /// 用于活动日志与响应消息的用户可读描述
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, PushError>;
