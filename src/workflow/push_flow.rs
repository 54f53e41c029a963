//! 推送流程 - 流程层
//!
//! 定义"一次 Accepted 提交"的完整处理顺序：
//! 提取标题/代码/语言/统计 → 通过协调通道递交特权 worker → 记录结果。
//! 不持有 page 资源，只依赖业务能力与通道句柄。

use crate::bridge::{PushHandle, Response};
use crate::infrastructure::JsExecutor;
use crate::models::{PushPayload, Submission};
use crate::services::{
    ActivityKind, ActivityRecorder, CodeExtractor, LanguageResolver, Notifier, StatsExtractor,
};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 标题提取失败时的兜底名
const UNKNOWN_TITLE: &str = "unknown-problem";

/// 推送流程
pub struct PushFlow {
    handle: PushHandle,
    recorder: Arc<ActivityRecorder>,
    notifier: Notifier,
    probe_timeout: Duration,
    enabled: bool,
}

impl PushFlow {
    pub fn new(
        handle: PushHandle,
        recorder: Arc<ActivityRecorder>,
        probe_timeout: Duration,
        enabled: bool,
    ) -> Self {
        Self {
            handle,
            recorder,
            notifier: Notifier::new(),
            probe_timeout,
            enabled,
        }
    }

    /// 处理一次已确认的 Accepted 提交
    ///
    /// 一旦开始就跑到成功或失败为止，没有用户触发的中断。
    pub async fn run(&self, executor: &JsExecutor, submission_id: &str) -> Result<()> {
        if !self.enabled {
            debug!("功能已关闭，跳过提交 {}", submission_id);
            return Ok(());
        }

        info!("🎯 检测到 Accepted 提交 (ID: {})，开始提取", submission_id);

        let title = self.extract_title(executor).await;

        // 代码取不到就中止，绝不发起网络调用
        let Some(extracted) = CodeExtractor::new(executor, self.probe_timeout)
            .extract()
            .await
        else {
            error!("✗ 无法从页面提取代码，中止推送");
            self.record_extraction_failure(&title).await;
            return Ok(());
        };

        let language = LanguageResolver::new(executor)
            .resolve(extracted.language.as_deref())
            .await;
        let stats = StatsExtractor::new(executor).extract().await;

        let submission = Submission {
            title,
            code: extracted.code,
            language,
            time: stats.as_ref().map(|s| s.time.clone()),
            memory: stats.as_ref().map(|s| s.memory.clone()),
        };

        info!(
            "📨 递交推送请求: {} [{}] ({} 字节)",
            submission.title,
            submission.language,
            submission.code.len()
        );

        match self.handle.push(PushPayload::from(&submission)).await {
            Some(Response::Push { success: true, .. }) => {
                info!("✓ worker 报告推送成功: {}", submission.title);
            }
            Some(Response::Push { success: false, error }) => {
                warn!(
                    "worker 报告推送失败: {}",
                    error.as_deref().unwrap_or("未知原因")
                );
            }
            Some(other) => debug!("收到意外响应: {:?}", other),
            // 未收到响应：只记日志，不重试
            None => warn!("推送请求未收到响应 (提交 {})", submission_id),
        }

        Ok(())
    }

    /// 从导航路径对应的链接文本提取题目标题
    async fn extract_title(&self, executor: &JsExecutor) -> String {
        let script = r#"
            (() => {
                const m = window.location.pathname.match(/\/problems\/([^\/]+)/);
                if (!m) return null;
                const link = document.querySelector(`a[href='${m[0] + '/'}']`);
                return link && link.innerText ? link.innerText : null;
            })()
        "#;

        match executor.eval(script).await {
            Ok(value) => match serde_json::from_value::<Option<String>>(value) {
                Ok(Some(title)) if !title.is_empty() => title,
                _ => {
                    warn!("无法从页面提取题目标题，使用兜底名");
                    UNKNOWN_TITLE.to_string()
                }
            },
            Err(e) => {
                warn!("标题提取脚本执行失败: {}", e);
                UNKNOWN_TITLE.to_string()
            }
        }
    }

    /// 提取失败的侧效应：日志条目 + 通知（best-effort）
    async fn record_extraction_failure(&self, title: &str) {
        let message = "✗ Push failed: cannot extract code from page".to_string();
        if let Err(e) = self.recorder.append(message, ActivityKind::Error).await {
            warn!("写入活动日志失败（忽略）: {}", e);
        }
        self.notifier.push_failed(title, "cannot extract code from page");
    }
}
