//! 应用编排层
//!
//! 持有浏览器连接与稀缺资源，驱动"观察 → 检测 → 推送"主循环。
//!
//! ```text
//! app (轮询页面状态探针)
//!     ↓ Detector / Debouncer 判定触发
//! workflow::PushFlow (提取 + 递交)
//!     ↓ bridge (消息通道)
//! worker (持有凭据，调 GitHub API)
//!     ↓ services (活动日志 / 通知)
//! ```

use crate::browser;
use crate::config::Config;
use crate::detector::{Debouncer, Detector, PageStatus};
use crate::infrastructure::JsExecutor;
use crate::workflow::PushFlow;
use crate::services::ActivityRecorder;
use crate::worker;
use anyhow::Result;
use chromiumoxide::Browser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// 目标页面 URL 需要包含的子串
const LEETCODE_URL_MARKER: &str = "leetcode.com";

/// 页面状态探针
///
/// 首次执行时自行安装导航钩子（pushState / replaceState / popstate）
/// 与 MutationObserver 时间戳；整页刷新后 window 被清空会自动重装。
/// 安装成功标记必须最后设置：页面加载中途任何一步抛出时，
/// 下一个节拍还会重试安装，而不是带着半套钩子死在原地。
const STATUS_PROBE: &str = r#"
    (() => {
        if (!window.__ltg_installed && document.documentElement) {
            window.__ltg_nav_epoch = window.__ltg_nav_epoch || 0;
            const bump = () => { window.__ltg_nav_epoch += 1; };
            const origPush = history.pushState;
            history.pushState = function (...args) { bump(); return origPush.apply(this, args); };
            const origReplace = history.replaceState;
            history.replaceState = function (...args) { bump(); return origReplace.apply(this, args); };
            window.addEventListener('popstate', bump);
            new MutationObserver(() => { window.__ltg_last_mutation = Date.now(); })
                .observe(document.documentElement, { childList: true, subtree: true });
            window.__ltg_last_mutation = Date.now();
            window.__ltg_installed = true;
        }
        const resEl = document.querySelector('[data-e2e-locator="submission-result"]')
            || document.querySelector('[class*="submission-result"]');
        const idMatch = window.location.pathname.match(/\/submissions\/(\d+)/);
        return {
            path: window.location.pathname,
            navEpoch: window.__ltg_nav_epoch,
            lastMutation: window.__ltg_last_mutation,
            resultText: resEl && resEl.innerText ? resEl.innerText : null,
            submissionId: idMatch ? idMatch[1] : null
        };
    })()
"#;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    executor: JsExecutor,
}

impl App {
    /// 初始化：连接浏览器，定位 LeetCode 标签页
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        if config.validate_for_push().is_err() {
            warn!("⚠️ GitHub 配置不完整，推送将在触发时失败并记入活动日志");
        }

        let (browser, page) =
            browser::connect_to_leetcode_page(config.browser_debug_port, LEETCODE_URL_MARKER)
                .await?;

        Ok(Self {
            config,
            _browser: browser,
            executor: JsExecutor::new(page),
        })
    }

    /// 运行主循环，直到 Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let recorder = Arc::new(ActivityRecorder::new(&self.config.activity_log_file));
        let handle = worker::spawn(self.config.clone(), recorder.clone());
        let flow = PushFlow::new(
            handle.clone(),
            recorder,
            Duration::from_millis(self.config.probe_timeout_ms),
            self.config.enabled,
        );

        let mut detector = Detector::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(self.config.debounce_ms));
        let mut last_mutation_stamp: u64 = 0;

        let mut poll = tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        let mut heartbeat =
            tokio::time::interval(Duration::from_secs(self.config.heartbeat_secs));

        info!("👀 开始观察页面，等待 Accepted 提交...");

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.observe_once(
                        &flow,
                        &mut detector,
                        &mut debouncer,
                        &mut last_mutation_stamp,
                    )
                    .await;
                }
                _ = heartbeat.tick() => {
                    // best-effort 存活性缓解，不是正确性保证
                    if handle.ping().await {
                        debug!("💓 worker 心跳正常");
                    } else {
                        warn!("💔 worker 心跳无响应");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("收到退出信号，停止观察");
                    return Ok(());
                }
            }
        }
    }

    /// 一次观察节拍：采样探针 → 导航复位 → 去抖 → 检测 → 触发流程
    async fn observe_once(
        &self,
        flow: &PushFlow,
        detector: &mut Detector,
        debouncer: &mut Debouncer,
        last_mutation_stamp: &mut u64,
    ) {
        let status: PageStatus = match self.executor.eval_as(STATUS_PROBE).await {
            Ok(status) => status,
            Err(e) => {
                debug!("状态探针执行失败: {}", e);
                return;
            }
        };

        if detector.observe_navigation(&status.path, status.nav_epoch) {
            debug!("检测到导航，检测器复位: {}", status.path);
            // 导航（含整页刷新）后重新武装去抖器，保证落定后必有一次检查
            debouncer.note_burst(Instant::now());
        }

        if status.last_mutation != *last_mutation_stamp {
            *last_mutation_stamp = status.last_mutation;
            debouncer.note_burst(Instant::now());
        }

        if !debouncer.should_check(Instant::now()) {
            return;
        }

        if let Some(submission_id) = detector.check(
            status.result_text.as_deref(),
            status.submission_id.as_deref(),
        ) {
            if let Err(e) = flow.run(&self.executor, &submission_id).await {
                error!("推送流程出错 (提交 {}): {}", submission_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 安装标记必须在 MutationObserver 挂上之后才设置：
    /// 否则加载中途一次抛出会让后续节拍永远跳过安装，检测静默失效
    #[test]
    fn test_probe_marks_installed_only_after_observer_attached() {
        let observe_pos = STATUS_PROBE
            .find(".observe(")
            .expect("探针应挂载 MutationObserver");
        let installed_pos = STATUS_PROBE
            .find("__ltg_installed = true")
            .expect("探针应设置安装标记");
        assert!(
            observe_pos < installed_pos,
            "安装标记必须在 observe 调用之后设置"
        );
    }

    /// 观察目标必须是 documentElement（文档存在即存在），
    /// 不能是加载中途可能为 null 的 document.body
    #[test]
    fn test_probe_observes_document_element() {
        assert!(STATUS_PROBE.contains(".observe(document.documentElement"));
        assert!(!STATUS_PROBE.contains(".observe(document.body"));
        // documentElement 尚不存在时本节拍整体跳过安装，下个节拍重试
        assert!(STATUS_PROBE.contains("!window.__ltg_installed && document.documentElement"));
    }

    /// 安装（含整页刷新后的重装）要刷新突变时间戳，
    /// 让轮询侧观察到变化并重新武装去抖器
    #[test]
    fn test_probe_stamps_mutation_time_on_install() {
        assert!(STATUS_PROBE.contains("window.__ltg_last_mutation = Date.now();"));
    }
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 LeetCode → GitHub 推送器启动");
    let repo = if config.repo_path.is_empty() {
        "(未配置)"
    } else {
        config.repo_path.as_str()
    };
    info!("📦 目标仓库: {}", repo);
    info!("🔌 浏览器调试端口: {}", config.browser_debug_port);
    info!("{}", "=".repeat(60));
}
