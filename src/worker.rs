//! 特权 worker - 持有凭据的推送处理端
//!
//! 职责：
//! - 消费协调通道上的请求
//! - 对每个推送请求 spawn 独立任务，任务持有响应端直到上传完成
//!   （响应端随任务存活，不依赖"返回 true 保持通道"之类的约定）
//! - 把一切失败转换为活动日志条目 + 用户通知，绝不向外抛出
//!
//! 流水线内无任何重试：失败对该次提交是终态。

use crate::bridge::{Envelope, PushHandle, Request, Response};
use crate::clients::GithubClient;
use crate::config::Config;
use crate::error::PushError;
use crate::models::{PushPayload, Submission};
use crate::services::{ActivityKind, ActivityRecorder, Notifier};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// 通道容量：单用户场景下请求极稀疏，给一点缓冲即可
const CHANNEL_CAPACITY: usize = 16;

/// 特权 worker 状态
struct PushWorker {
    config: Config,
    github: GithubClient,
    recorder: Arc<ActivityRecorder>,
    notifier: Notifier,
}

/// 启动 worker，返回页面侧使用的发送句柄
pub fn spawn(config: Config, recorder: Arc<ActivityRecorder>) -> PushHandle {
    let (tx, rx) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);

    let worker = Arc::new(PushWorker {
        github: GithubClient::new(&config),
        config,
        recorder,
        notifier: Notifier::new(),
    });

    tokio::spawn(run(worker, rx));

    PushHandle::new(tx)
}

async fn run(worker: Arc<PushWorker>, mut rx: mpsc::Receiver<Envelope>) {
    debug!("推送 worker 已启动");

    while let Some(envelope) = rx.recv().await {
        match envelope.request {
            Request::Ping => {
                let _ = envelope.reply.send(Response::alive());
            }
            Request::PushToGithub { payload } => {
                let worker = worker.clone();
                // 响应端交给任务持有，上传完成前通道始终有人负责
                tokio::spawn(async move {
                    let response = worker.handle_push(payload).await;
                    if envelope.reply.send(response).is_err() {
                        warn!("请求方已不再等待响应");
                    }
                });
            }
        }
    }

    debug!("推送 worker 退出");
}

impl PushWorker {
    async fn handle_push(&self, payload: PushPayload) -> Response {
        let submission = Submission::from(payload);

        match self.try_push(&submission).await {
            Ok(_) => {
                self.report_success(&submission).await;
                Response::ok()
            }
            Err(e) => {
                let message = e.user_message();
                self.report_failure(&submission, &e).await;
                Response::fail(message)
            }
        }
    }

    /// 推送前置检查 + 上传，按错误分类中止
    async fn try_push(&self, submission: &Submission) -> Result<(), PushError> {
        if !self.config.enabled {
            return Err(PushError::Disabled);
        }
        self.config.validate_for_push()?;
        self.github.push_solution(submission).await?;
        Ok(())
    }

    /// 成功侧效应：日志条目 + 通知，都是 best-effort
    async fn report_success(&self, submission: &Submission) {
        info!("✅ 推送完成: {}", submission.title);

        let message = format!("✓ Pushed: {} [{}]", submission.title, submission.language);
        if let Err(e) = self.recorder.append(message, ActivityKind::Success).await {
            warn!("写入活动日志失败（忽略）: {}", e);
        }
        self.notifier.push_succeeded(&submission.title);
    }

    /// 失败侧效应：按错误分类写日志条目 + 通知，都是 best-effort
    async fn report_failure(&self, submission: &Submission, push_error: &PushError) {
        error!("推送失败: {} — {}", submission.title, push_error);

        let (message, kind) = match push_error {
            // 功能关闭：只留一条日志，不打扰用户
            PushError::Disabled => ("Extension is disabled".to_string(), ActivityKind::Warning),
            PushError::Transport(e) => {
                self.notifier.network_error(&e.to_string());
                (format!("✗ Connection error: {}", e), ActivityKind::Error)
            }
            PushError::RemoteRejected { message, .. } => {
                self.notifier.push_failed(&submission.title, message);
                (format!("✗ Push failed: {}", message), ActivityKind::Error)
            }
            other => {
                self.notifier.push_failed(&submission.title, &other.to_string());
                (format!("✗ Push failed: {}", other), ActivityKind::Error)
            }
        };

        if let Err(e) = self.recorder.append(message, kind).await {
            warn!("写入活动日志失败（忽略）: {}", e);
        }
    }
}
