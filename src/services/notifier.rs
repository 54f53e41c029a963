//! 用户通知服务 - 业务能力层
//!
//! 只负责"让用户看见结果"，发完即忘，失败不影响推送结果。

use tracing::info;

/// 通知服务
#[derive(Debug, Default, Clone, Copy)]
pub struct Notifier;

impl Notifier {
    pub fn new() -> Self {
        Self
    }

    /// 推送成功通知
    pub fn push_succeeded(&self, title: &str) {
        self.show("✓ Push Successful", &format!("{} has been pushed to GitHub!", title));
    }

    /// 推送失败通知
    pub fn push_failed(&self, title: &str, reason: &str) {
        self.show("✗ Push Failed", &format!("Failed to push {}: {}", title, reason));
    }

    /// 网络错误通知
    pub fn network_error(&self, reason: &str) {
        self.show("✗ Network Error", &format!("Connection failed: {}", reason));
    }

    fn show(&self, title: &str, message: &str) {
        info!(target: "notification", "🔔 {} — {}", title, message);
    }
}
