//! 活动日志服务 - 业务能力层
//!
//! 职责：
//! - 追加一条活动记录（成功/失败/提示）
//! - 日志上限 50 条，超出时从头部淘汰（FIFO）
//! - 整体原子落盘（写临时文件 + rename），读取方只会看到完整列表

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 日志上限条数
pub const MAX_ENTRIES: usize = 50;

/// 活动记录严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Info,
    Success,
    Warning,
    Error,
}

/// 一条活动记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub message: String,
    pub kind: ActivityKind,
    pub time: DateTime<Utc>,
}

/// 活动日志服务
pub struct ActivityRecorder {
    log_path: PathBuf,
}

impl ActivityRecorder {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    /// 追加一条记录并落盘
    pub async fn append(&self, message: impl Into<String>, kind: ActivityKind) -> Result<()> {
        let message = message.into();
        debug!("活动记录 [{:?}]: {}", kind, message);

        let mut entries = self.read_all().await?;
        entries.push(ActivityEntry {
            message,
            kind,
            time: Utc::now(),
        });

        // FIFO 淘汰：只保留最近 MAX_ENTRIES 条
        if entries.len() > MAX_ENTRIES {
            let excess = entries.len() - MAX_ENTRIES;
            entries.drain(..excess);
        }

        self.persist(&entries).await
    }

    /// 读取全部记录（文件不存在视为空列表）
    pub async fn read_all(&self) -> Result<Vec<ActivityEntry>> {
        match fs::read_to_string(&self.log_path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("活动日志损坏: {}", self.log_path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).with_context(|| {
                format!("无法读取活动日志: {}", self.log_path.display())
            }),
        }
    }

    /// 整体写入：先写临时文件再 rename，避免读取方看到半截内容
    async fn persist(&self, entries: &[ActivityEntry]) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = tmp_path_for(&self.log_path);

        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("无法写入临时日志文件: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.log_path)
            .await
            .with_context(|| format!("无法替换活动日志: {}", self.log_path.display()))?;

        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
