//! # LeetCode → GitHub 推送器
//!
//! 附着到本地浏览器（CDP 调试端口）上的自动化工具：
//! 观察 LeetCode 标签页，检测到 Accepted 提交后提取代码与元数据，
//! 通过 GitHub 内容 API 把题解推送到配置的仓库。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/JsExecutor` - 唯一的 page owner，只暴露执行 JS 的能力
//! - `browser/` - 连接浏览器、定位目标标签页
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/CodeExtractor` - 代码提取（Monaco 探针 + 渲染文本兜底）
//! - `services/LanguageResolver` - 语言解析（映射表 + 多级兜底）
//! - `services/StatsExtractor` - 运行统计提取（正则 + 启发式）
//! - `services/ActivityRecorder` - 有界活动日志（50 条 FIFO，原子落盘）
//! - `services/Notifier` - 用户通知（发完即忘）
//! - `clients/GithubClient` - GitHub 内容 API（先查 sha 后写）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/PushFlow` - 一次 Accepted 提交的完整处理顺序
//! - `detector` - 提交检测状态机 + 去抖器
//! - `bridge` / `worker` - 页面侧与特权侧之间的单请求/单响应通道
//!
//! ### ④ 编排层（Orchestration）
//! - `app` - 持有浏览器资源，驱动观察主循环

pub mod app;
pub mod bridge;
pub mod browser;
pub mod clients;
pub mod config;
pub mod detector;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod services;
pub mod worker;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use bridge::{PushHandle, Request, Response};
pub use clients::{GithubClient, PushOutcome};
pub use config::Config;
pub use detector::{Debouncer, Detector, PageStatus};
pub use error::PushError;
pub use infrastructure::JsExecutor;
pub use models::{PushPayload, Submission};
pub use workflow::PushFlow;
