//! 程序配置
//!
//! 配置来源优先级：`config.toml` 文件 < 环境变量。
//! 凭据（token）与仓库路径只由配置层持有，检测侧只读。

use crate::error::PushError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub 个人访问令牌
    pub github_token: String,
    /// 目标仓库，格式 "owner/name"
    pub repo_path: String,
    /// 是否启用自动推送（默认开启）
    pub enabled: bool,
    /// GitHub API 地址（测试时可指向 mock 服务器）
    pub github_api_base: String,
    /// 仓库内存放题解的目录前缀
    pub solution_dir: String,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 活动日志文件路径
    pub activity_log_file: String,
    /// DOM 静默去抖窗口（毫秒）
    pub debounce_ms: u64,
    /// 页面探针超时（毫秒）
    pub probe_timeout_ms: u64,
    /// 状态轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 心跳间隔（秒）
    pub heartbeat_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            repo_path: String::new(),
            enabled: true,
            github_api_base: "https://api.github.com".to_string(),
            solution_dir: "solution".to_string(),
            browser_debug_port: 9222,
            activity_log_file: "activity_log.json".to_string(),
            debounce_ms: 500,
            probe_timeout_ms: 1000,
            poll_interval_ms: 150,
            heartbeat_secs: 25,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：先读 `config.toml`（可缺省），再用环境变量覆盖
    pub fn load() -> Result<Self> {
        let mut config = match Path::new("config.toml").exists() {
            true => Self::from_file(Path::new("config.toml"))?,
            false => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// 从 TOML 文件读取配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;
        Ok(config)
    }

    /// 环境变量覆盖（变量不存在或无法解析时保留原值）
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("GITHUB_TOKEN") {
            self.github_token = v;
        }
        if let Ok(v) = std::env::var("REPO_PATH") {
            self.repo_path = v;
        }
        if let Some(v) = env_parse("EXTENSION_ENABLED") {
            self.enabled = v;
        }
        if let Ok(v) = std::env::var("GITHUB_API_BASE") {
            self.github_api_base = v;
        }
        if let Some(v) = env_parse("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = v;
        }
        if let Ok(v) = std::env::var("ACTIVITY_LOG_FILE") {
            self.activity_log_file = v;
        }
        if let Some(v) = env_parse("VERBOSE_LOGGING") {
            self.verbose_logging = v;
        }
    }

    /// 检查推送所需的配置是否齐全
    ///
    /// # 返回
    /// 缺失项以 `PushError::ConfigMissing` 返回
    pub fn validate_for_push(&self) -> std::result::Result<(), PushError> {
        if self.github_token.trim().is_empty() {
            return Err(PushError::ConfigMissing("github_token 未设置"));
        }
        if self.repo_path.trim().is_empty() {
            return Err(PushError::ConfigMissing("repo_path 未设置"));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
