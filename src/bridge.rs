//! 协调通道 - 消息桥
//!
//! 页面侧（无凭据）与特权侧（持有 token 的 worker）之间的
//! 单请求/单响应中继。消息形状与原协议保持一致：
//! - `{action: "pushToGithub", payload: {...}}` → `{success, error?}`
//! - `{action: "ping"}` → `{status: "alive"}`
//!
//! 传递失败（worker 已退出或响应端被丢弃）等同于"未收到响应"：
//! 只记日志，不重试。

use crate::models::PushPayload;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// 请求动作
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    PushToGithub { payload: PushPayload },
    Ping,
}

/// 响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Response {
    Push {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Alive {
        status: String,
    },
}

impl Response {
    pub fn ok() -> Self {
        Response::Push {
            success: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Response::Push {
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn alive() -> Self {
        Response::Alive {
            status: "alive".to_string(),
        }
    }
}

/// 通道上传输的信封：请求 + 一次性响应端
pub struct Envelope {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

/// 页面侧持有的发送句柄
#[derive(Clone)]
pub struct PushHandle {
    tx: mpsc::Sender<Envelope>,
}

impl PushHandle {
    pub fn new(tx: mpsc::Sender<Envelope>) -> Self {
        Self { tx }
    }

    /// 发送推送请求并等待唯一一次响应
    ///
    /// # 返回
    /// `None` 表示传递失败（worker 不在或响应被丢弃）
    pub async fn push(&self, payload: PushPayload) -> Option<Response> {
        self.send(Request::PushToGithub { payload }).await
    }

    /// 心跳探测，best-effort 的存活性缓解手段
    pub async fn ping(&self) -> bool {
        matches!(
            self.send(Request::Ping).await,
            Some(Response::Alive { status }) if status == "alive"
        )
    }

    async fn send(&self, request: Request) -> Option<Response> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            request,
            reply: reply_tx,
        };

        if self.tx.send(envelope).await.is_err() {
            warn!("消息通道已关闭，请求无法送达");
            return None;
        }

        match reply_rx.await {
            Ok(response) => Some(response),
            Err(_) => {
                warn!("响应端被丢弃，视为未收到响应");
                None
            }
        }
    }
}
