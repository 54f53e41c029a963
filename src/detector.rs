//! 提交检测器
//!
//! 每个标签页一个 `Detector` 实例，状态全部是显式字段，
//! 不依赖任何全局可变状态：
//! - Idle：当前提交尚未处理
//! - Handled：当前提交已触发过一次推送
//!
//! Idle→Handled：结果文本包含 "Accepted" 且提交 ID 与上次处理的不同。
//! Handled→Idle：发生任何导航（pushState / replaceState / popstate，
//! 或轮询观察到路径变化）。
//!
//! `Debouncer` 负责 DOM 突变风暴的尾沿去抖：每次突变重新计时，
//! 静默满一个窗口后才评估检测谓词。

use serde::Deserialize;
use std::time::{Duration, Instant};

/// 结果文本里的通过标记
const ACCEPTED_MARKER: &str = "Accepted";

/// 页面状态探针的一次采样
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStatus {
    /// 当前 location.pathname
    pub path: String,
    /// 导航纪元：页面内 history 钩子每次导航 +1
    #[serde(default)]
    pub nav_epoch: u64,
    /// 最近一次 DOM 突变的时间戳（页面内 Date.now()）
    #[serde(default)]
    pub last_mutation: u64,
    /// 提交结果指示器的文本
    pub result_text: Option<String>,
    /// 从路径里提取的提交 ID
    pub submission_id: Option<String>,
}

/// 提交检测器（每标签页一个实例）
#[derive(Debug, Default)]
pub struct Detector {
    last_handled: Option<String>,
    last_path: Option<String>,
    last_nav_epoch: u64,
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 观察导航状态，路径或导航纪元变化时复位
    ///
    /// # 返回
    /// true 表示发生了复位（Handled→Idle）
    pub fn observe_navigation(&mut self, path: &str, nav_epoch: u64) -> bool {
        let path_changed = self
            .last_path
            .as_deref()
            .is_some_and(|previous| previous != path);
        let epoch_changed = nav_epoch != self.last_nav_epoch;

        self.last_path = Some(path.to_string());
        self.last_nav_epoch = nav_epoch;

        if path_changed || epoch_changed {
            self.last_handled = None;
            return true;
        }
        false
    }

    /// 评估检测谓词
    ///
    /// 同一提交 ID 在下次导航复位之前至多触发一次。
    ///
    /// # 返回
    /// 需要触发推送时返回提交 ID
    pub fn check(
        &mut self,
        result_text: Option<&str>,
        submission_id: Option<&str>,
    ) -> Option<String> {
        let accepted = result_text.is_some_and(|t| t.contains(ACCEPTED_MARKER));
        if !accepted {
            return None;
        }

        let id = submission_id?;
        if self.last_handled.as_deref() == Some(id) {
            return None;
        }

        self.last_handled = Some(id.to_string());
        Some(id.to_string())
    }
}

/// 尾沿去抖器
///
/// 初始即为待检状态，保证启动时立刻跑一次检查，
/// 覆盖观察开始前结果已经出现的情况。
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: bool,
    last_burst: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: true,
            last_burst: None,
        }
    }

    /// 记录一次突变风暴，重新开始计时
    pub fn note_burst(&mut self, now: Instant) {
        self.pending = true;
        self.last_burst = Some(now);
    }

    /// 是否到了评估时机（静默满一个窗口）
    ///
    /// 返回 true 的同时清除待检标记，直到下一次突变。
    pub fn should_check(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        let quiescent = match self.last_burst {
            Some(burst) => now.duration_since(burst) >= self.window,
            None => true,
        };
        if quiescent {
            self.pending = false;
        }
        quiescent
    }
}
